use crate::{
    error::WarpError,
    interpolation::{interpolate_pixel, InterpolationMode},
    parallel,
};

use quadwarp_geometry::{Homography, Point2d};
use quadwarp_image::{Image, ImageDtype, ImageError};

/// Map a destination pixel center back into the source image.
///
/// Returns the source position in pixel-edge coordinates, or `None` when the
/// pixel center maps to the line at infinity.
fn source_position(inv_m: &Homography, x: usize, y: usize) -> Option<(f64, f64)> {
    let [u, v, w] = inv_m.transform_homogeneous(Point2d::new(x as f64 + 0.5, y as f64 + 0.5));
    if w.abs() < f64::EPSILON {
        return None;
    }
    Some((u / w, v / w))
}

/// Applies a perspective transformation to an image.
///
/// Every destination pixel center is mapped through the inverse of `m`. When
/// the result falls inside the source span `[0, width] x [0, height]` the
/// source is sampled there, otherwise the pixel is set to `fill`.
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (new_height, new_width, channels).
/// * `m` - The perspective transformation src -> dst.
/// * `interpolation` - The interpolation mode to use.
/// * `fill` - The value written where there is no source pixel.
///
/// # Errors
///
/// Fails if `src` has no pixels or `m` is not invertible.
///
/// # Example
///
/// ```
/// use quadwarp_geometry::Homography;
/// use quadwarp_image::{Image, ImageSize};
/// use quadwarp_imgproc::interpolation::InterpolationMode;
/// use quadwarp_imgproc::warp::warp_perspective;
///
/// let src = Image::<f32, 1>::new(
///   ImageSize {
///     width: 4,
///     height: 5,
///   },
///   vec![0.0f32; 4 * 5]
/// ).unwrap();
///
/// let m = Homography::from_translation(-1.0, 1.0);
///
/// let mut dst = Image::<f32, 1>::from_size_val(
///   ImageSize {
///     width: 2,
///     height: 3,
///   },
///   0.0
/// ).unwrap();
///
/// warp_perspective(&src, &mut dst, &m, InterpolationMode::Bilinear, [0.0]).unwrap();
///
/// assert_eq!(dst.size().width, 2);
/// assert_eq!(dst.size().height, 3);
/// ```
pub fn warp_perspective<T: ImageDtype, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    m: &Homography,
    interpolation: InterpolationMode,
    fill: [T; C],
) -> Result<(), WarpError> {
    if src.size().is_empty() {
        return Err(ImageError::ZeroSizedImage(src.width(), src.height()).into());
    }

    let inv_m = m.inverse()?;
    let (src_width, src_height) = (src.width() as f64, src.height() as f64);

    parallel::par_iter_rows_indexed(dst, |x, y, dst_pixel| {
        let inside = source_position(&inv_m, x, y)
            .filter(|&(u, v)| u >= 0.0 && u <= src_width && v >= 0.0 && v <= src_height);

        match inside {
            Some((u, v)) => {
                // pixel-edge coordinates to sample indices
                let val = interpolate_pixel(src, (u - 0.5) as f32, (v - 0.5) as f32, interpolation);
                dst_pixel
                    .iter_mut()
                    .zip(val.iter())
                    .for_each(|(pixel, &v)| *pixel = T::from_f32(v));
            }
            None => dst_pixel.copy_from_slice(&fill),
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadwarp_geometry::ErrorKind;
    use quadwarp_image::ImageSize;

    fn ramp4x4() -> Result<Image<f32, 1>, ImageError> {
        Image::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            (0..16).map(|v| v as f32).collect(),
        )
    }

    #[test]
    fn source_position_centers() {
        let m = Homography::from_translation(1.0, -1.0);
        assert_eq!(source_position(&m, 0, 0), Some((1.5, -0.5)));
        assert_eq!(source_position(&m, 2, 3), Some((3.5, 2.5)));
    }

    #[test]
    fn warp_perspective_identity() -> Result<(), WarpError> {
        let image = ramp4x4()?;
        let mut image_transformed = Image::from_size_val(image.size(), -1.0)?;

        warp_perspective(
            &image,
            &mut image_transformed,
            &Homography::identity(),
            InterpolationMode::Bilinear,
            [0.0],
        )?;

        assert_eq!(image_transformed, image);

        Ok(())
    }

    #[test]
    fn warp_perspective_hflip() -> Result<(), WarpError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0],
        )?;

        let image_expected = vec![1.0, 0.0, 3.0, 2.0, 5.0, 4.0];

        // flip matrix, x -> width - x
        let m = Homography::from_rows([[-1.0, 0.0, 2.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
            [0.0],
        )?;

        assert_eq!(image_transformed.num_channels(), 1);
        assert_eq!(image_transformed.as_slice(), image_expected);

        Ok(())
    }

    #[test]
    fn warp_perspective_shift() -> Result<(), WarpError> {
        let image = ramp4x4()?;

        // shift left by 1 pixel
        let m = Homography::from_translation(-1.0, 0.0);

        let image_expected = vec![
            1.0f32, 2.0, 3.0, -1.0, 5.0, 6.0, 7.0, -1.0, 9.0, 10.0, 11.0, -1.0, 13.0, 14.0, 15.0,
            -1.0,
        ];

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Nearest,
            [-1.0],
        )?;

        assert_eq!(image_transformed.as_slice(), image_expected);

        Ok(())
    }

    #[test]
    fn warp_perspective_downscale() -> Result<(), WarpError> {
        let image = Image::<u8, 3>::from_size_pixel([4, 4].into(), [10, 20, 30])?;
        let m = Homography::from_rows([[0.5, 0.0, 0.0], [0.0, 0.5, 0.0], [0.0, 0.0, 1.0]]);

        let mut image_transformed = Image::<u8, 3>::from_size_val([2, 2].into(), 0)?;

        warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
            [255, 255, 255],
        )?;

        assert!(image_transformed
            .as_slice()
            .chunks_exact(3)
            .all(|px| px == [10, 20, 30]));

        Ok(())
    }

    #[test]
    fn warp_perspective_singular() -> Result<(), WarpError> {
        let image = ramp4x4()?;
        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;
        let m = Homography::from_rows([[1.0, 2.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 1.0]]);

        let res = warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
            [0.0],
        );

        assert_eq!(res.map_err(|e| e.kind()), Err(ErrorKind::DegenerateTransform));

        Ok(())
    }

    #[test]
    fn warp_perspective_empty_source() -> Result<(), WarpError> {
        let image = Image::<f32, 1>::new([0, 3].into(), vec![])?;
        let mut image_transformed = Image::<_, 1>::from_size_val([2, 2].into(), 0.0)?;

        let res = warp_perspective(
            &image,
            &mut image_transformed,
            &Homography::identity(),
            InterpolationMode::Bilinear,
            [0.0],
        );

        assert_eq!(
            res,
            Err(WarpError::Image(ImageError::ZeroSizedImage(0, 3)))
        );

        Ok(())
    }
}
