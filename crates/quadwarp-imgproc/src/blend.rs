use quadwarp_image::{Image, ImageDtype, ImageError, ImageSize, RgbImage};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

use crate::{crop::crop_image, error::WarpError, parallel};

/// Performs weighted addition of two images `src1` and `src2` with weights `alpha`
/// and `beta`, and an optional scalar `gamma`. The formula used is:
///
/// dst(x,y,c) = (src1(x,y,c) * alpha + src2(x,y,c) * beta + gamma)
///
/// The sum is computed in `f32` and converted back to the sample type, which
/// rounds and saturates for `u8`.
///
/// # Arguments
///
/// * `src1` - The first input image.
/// * `alpha` - Weight of the first image elements to be multiplied.
/// * `src2` - The second input image.
/// * `beta` - Weight of the second image elements to be multiplied.
/// * `gamma` - Scalar added to each sum.
/// * `dst` - The output image.
///
/// # Errors
///
/// Returns an error if the sizes of `src1` and `src2` do not match.
/// Returns an error if the size of `dst` does not match the size of `src1` or `src2`.
pub fn add_weighted<T: ImageDtype, const C: usize>(
    src1: &Image<T, C>,
    alpha: f32,
    src2: &Image<T, C>,
    beta: f32,
    gamma: f32,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError> {
    if src1.size() != src2.size() {
        return Err(ImageError::InvalidImageSize(
            src1.cols(),
            src1.rows(),
            src2.cols(),
            src2.rows(),
        ));
    }

    if src1.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src1.width(),
            src1.height(),
            dst.width(),
            dst.height(),
        ));
    }

    // compute the weighted sum
    parallel::par_iter_rows_val_two(src1, src2, dst, |&src1_pixel, &src2_pixel, dst_pixel| {
        let (a, b): (f32, f32) = (src1_pixel.into(), src2_pixel.into());
        *dst_pixel = T::from_f32(a * alpha + b * beta + gamma);
    });

    Ok(())
}

/// Compose `overlay` over `base` for a visual alignment check.
///
/// The overlay's top-left pixel is placed at `(offset_x, offset_y)` of `base`.
/// Where the two overlap the output is
/// `base * (1 - opacity) + overlay * opacity`; elsewhere it is `base`. The
/// output always has the size of `base`.
///
/// # Errors
///
/// Fails with [`WarpError::InvalidOpacity`] if `opacity` is not within
/// `[0, 1]`.
///
/// The overlapping windows are blended with [`add_weighted`] using weights
/// `1 - opacity` and `opacity`.
///
/// # Example
///
/// ```
/// use quadwarp_image::RgbImage;
/// use quadwarp_imgproc::blend::superimpose;
///
/// let base = RgbImage::from_size_pixel([4, 4].into(), [0, 0, 0]).unwrap();
/// let overlay = RgbImage::from_size_pixel([2, 2].into(), [200, 100, 50]).unwrap();
///
/// let preview = superimpose(&base, &overlay, 1, 1, 0.5).unwrap();
///
/// assert_eq!(preview.get_pixel(0, 0).unwrap(), [0, 0, 0]);
/// assert_eq!(preview.get_pixel(1, 1).unwrap(), [100, 50, 25]);
/// ```
pub fn superimpose(
    base: &RgbImage,
    overlay: &RgbImage,
    offset_x: i64,
    offset_y: i64,
    opacity: f32,
) -> Result<RgbImage, WarpError> {
    if !(0.0..=1.0).contains(&opacity) {
        return Err(WarpError::InvalidOpacity(opacity));
    }

    let mut dst = base.clone();

    let cols = overlap(offset_x, overlay.width(), base.width());
    let rows = overlap(offset_y, overlay.height(), base.height());
    let (Some((x0, x1)), Some((y0, y1))) = (cols, rows) else {
        return Ok(dst);
    };

    let size = ImageSize {
        width: x1 - x0,
        height: y1 - y0,
    };

    // the overlapping window of each image
    let mut under = RgbImage::from_size_val(size, 0)?;
    crop_image(base, &mut under, x0, y0)?;

    let mut over = RgbImage::from_size_val(size, 0)?;
    let (ox, oy) = (
        (x0 as i128 - offset_x as i128) as usize,
        (y0 as i128 - offset_y as i128) as usize,
    );
    crop_image(overlay, &mut over, ox, oy)?;

    let mut blended = RgbImage::from_size_val(size, 0)?;
    add_weighted(&under, 1.0 - opacity, &over, opacity, 0.0, &mut blended)?;

    // paste the blended window back
    let row_len = size.width * 3;
    dst.as_slice_mut()
        .par_chunks_exact_mut(base.width() * 3)
        .skip(y0)
        .zip(blended.as_slice().par_chunks_exact(row_len))
        .for_each(|(dst_row, src_row)| {
            dst_row[x0 * 3..x0 * 3 + row_len].copy_from_slice(src_row);
        });

    Ok(dst)
}

/// The span `[start, end)` of `0..len` covered by `count` items placed at
/// `offset`, or `None` if they do not meet.
fn overlap(offset: i64, count: usize, len: usize) -> Option<(usize, usize)> {
    let offset = offset as i128;
    let start = offset.max(0);
    let end = (offset + count as i128).min(len as i128);
    (start < end).then_some((start as usize, end as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadwarp_image::ImageSize;

    #[test]
    fn test_add_weighted() -> Result<(), ImageError> {
        let src1_data = vec![0.0f32, 1.0, 2.0, 3.0];
        let src1 = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            src1_data,
        )?;
        let src2_data = vec![4.0f32, 5.0, 6.0, 7.0];
        let src2 = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            src2_data,
        )?;
        let mut dst = Image::<_, 1>::from_size_val(src1.size(), 0.0f32)?;

        add_weighted(&src1, 0.5, &src2, 0.5, 1.0, &mut dst)?;

        assert_eq!(dst.as_slice(), &[3.0, 4.0, 5.0, 6.0]);

        Ok(())
    }

    #[test]
    fn test_add_weighted_saturates_u8() -> Result<(), ImageError> {
        let src1 = Image::<u8, 3>::from_size_val([2, 1].into(), 200)?;
        let src2 = Image::<u8, 3>::from_size_val([2, 1].into(), 100)?;
        let mut dst = Image::<u8, 3>::from_size_val([2, 1].into(), 0)?;

        add_weighted(&src1, 1.0, &src2, 1.0, 0.0, &mut dst)?;
        assert!(dst.as_slice().iter().all(|&v| v == 255));

        add_weighted(&src1, 0.25, &src2, 0.25, 0.0, &mut dst)?;
        assert!(dst.as_slice().iter().all(|&v| v == 75));

        Ok(())
    }

    #[test]
    fn test_add_weighted_size_mismatch() -> Result<(), ImageError> {
        let src1 = Image::<f32, 1>::from_size_val([2, 2].into(), 0.0)?;
        let src2 = Image::<f32, 1>::from_size_val([3, 2].into(), 0.0)?;
        let mut dst = Image::<f32, 1>::from_size_val([2, 2].into(), 0.0)?;

        let res = add_weighted(&src1, 1.0, &src2, 1.0, 0.0, &mut dst);
        assert_eq!(res, Err(ImageError::InvalidImageSize(2, 2, 3, 2)));

        Ok(())
    }

    #[test]
    fn test_superimpose_offsets() -> Result<(), WarpError> {
        let base = RgbImage::from_size_pixel([4, 3].into(), [10, 10, 10])?;
        let overlay = RgbImage::from_size_pixel([3, 3].into(), [110, 210, 10])?;

        // only the overlay's bottom-right 2x1 corner lands on base
        let preview = superimpose(&base, &overlay, -1, -2, 0.5)?;

        assert_eq!(preview.size(), base.size());
        assert_eq!(preview.get_pixel(0, 0)?, [60, 110, 10]);
        assert_eq!(preview.get_pixel(1, 0)?, [60, 110, 10]);
        assert_eq!(preview.get_pixel(2, 0)?, [10, 10, 10]);
        assert_eq!(preview.get_pixel(0, 1)?, [10, 10, 10]);

        Ok(())
    }

    #[test]
    fn test_superimpose_extreme_offsets() -> Result<(), WarpError> {
        let base = RgbImage::from_size_pixel([3, 2].into(), [10, 20, 30])?;
        let overlay = RgbImage::from_size_pixel([2, 2].into(), [250, 250, 250])?;

        for (dx, dy) in [
            (i64::MIN, 0),
            (0, i64::MIN),
            (i64::MAX, 0),
            (0, i64::MAX),
            (i64::MIN, i64::MAX),
            (-2, 0),
            (3, 0),
        ] {
            assert_eq!(superimpose(&base, &overlay, dx, dy, 0.5)?, base);
        }

        // an overlay larger than base covers all of it
        let preview = superimpose(&overlay, &base, -1, 0, 1.0)?;
        assert_eq!(preview.get_pixel(0, 0)?, [10, 20, 30]);
        assert_eq!(preview.get_pixel(1, 1)?, [10, 20, 30]);

        Ok(())
    }

    #[test]
    fn test_overlap() {
        assert_eq!(overlap(-1, 3, 4), Some((0, 2)));
        assert_eq!(overlap(2, 5, 4), Some((2, 4)));
        assert_eq!(overlap(4, 5, 4), None);
        assert_eq!(overlap(i64::MAX, usize::MAX, 4), None);
        assert_eq!(overlap(i64::MIN, 3, 4), None);
    }

    #[test]
    fn test_superimpose_opacity_bounds() -> Result<(), WarpError> {
        let base = RgbImage::from_size_pixel([2, 2].into(), [0, 0, 0])?;
        let overlay = RgbImage::from_size_pixel([2, 2].into(), [255, 255, 255])?;

        assert_eq!(superimpose(&base, &overlay, 0, 0, 0.0)?, base);
        assert_eq!(superimpose(&base, &overlay, 0, 0, 1.0)?, overlay);
        assert_eq!(
            superimpose(&base, &overlay, 0, 0, 1.5),
            Err(WarpError::InvalidOpacity(1.5))
        );
        assert!(superimpose(&base, &overlay, 0, 0, f32::NAN).is_err());

        Ok(())
    }
}
