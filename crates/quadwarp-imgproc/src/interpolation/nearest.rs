use quadwarp_image::{Image, ImageDtype};

/// Kernel for nearest neighbor interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The nearest pixel values.
pub(crate) fn nearest_neighbor_interpolation<T: ImageDtype, const C: usize>(
    image: &Image<T, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows(), image.cols());

    // round half up, then clamp onto the image
    let iu = (u + 0.5).floor().clamp(0.0, (cols - 1) as f32) as usize;
    let iv = (v + 0.5).floor().clamp(0.0, (rows - 1) as f32) as usize;

    let base = (iv * cols + iu) * C;
    let src = &image.as_slice()[base..base + C];

    let mut pixel = [0.0; C];
    for (dst, &val) in pixel.iter_mut().zip(src) {
        *dst = val.into();
    }

    pixel
}
