use quadwarp_geometry::Rect;
use quadwarp_image::{Image, ImageError, ImageSize};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::error::WarpError;

/// Crop an image to a specified region.
///
/// The region has the size of `dst` and its top-left corner at `(x, y)`.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Errors
///
/// Fails if the region does not fit inside `src`.
///
/// # Examples
///
/// ```rust
/// use quadwarp_image::{Image, ImageSize};
/// use quadwarp_imgproc::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let (right, bottom) = (x.saturating_add(dst.cols()), y.saturating_add(dst.rows()));
    if right > src.cols() || bottom > src.rows() {
        return Err(ImageError::PixelIndexOutOfBounds(
            right,
            bottom,
            src.cols(),
            src.rows(),
        ));
    }

    let dst_cols = dst.cols();
    if dst_cols == 0 {
        return Ok(());
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(i, dst_row)| {
            // get the slice at the top left corner
            let offset = (y + i) * src.cols() * C + x * C;
            let src_slice = &src.as_slice()[offset..offset + dst_cols * C];

            // copy the slice to the destination
            dst_row.copy_from_slice(src_slice);
        });

    Ok(())
}

/// Crop the pixels under a rubber-band rectangle.
///
/// The left and top edges are truncated towards zero, as are the right and
/// bottom edges computed from them; the result is then clamped to the image.
///
/// # Errors
///
/// Fails with [`WarpError::EmptyRoi`] if no pixel is left after clamping or
/// the rectangle is not finite.
pub fn crop_roi<T, const C: usize>(src: &Image<T, C>, rect: Rect) -> Result<Image<T, C>, WarpError>
where
    T: Copy + Default + Send + Sync,
{
    let finite = [rect.x, rect.y, rect.width, rect.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return Err(WarpError::EmptyRoi(rect));
    }

    let left = rect.x.trunc();
    let top = rect.y.trunc();
    let right = (left + rect.width).trunc();
    let bottom = (top + rect.height).trunc();

    let clamp = |v: f64, hi: usize| v.clamp(0.0, hi as f64) as usize;
    let (left, right) = (clamp(left, src.cols()), clamp(right, src.cols()));
    let (top, bottom) = (clamp(top, src.rows()), clamp(bottom, src.rows()));

    if right <= left || bottom <= top {
        return Err(WarpError::EmptyRoi(rect));
    }

    let size = ImageSize {
        width: right - left,
        height: bottom - top,
    };

    log::debug!("cropping {size} at ({left}, {top})");

    let mut dst = Image::from_size_val(size, T::default())?;
    crop_image(src, &mut dst, left, top)?;

    Ok(dst)
}
