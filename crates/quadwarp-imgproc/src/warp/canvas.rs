use quadwarp_geometry::{Homography, Point2d, Quad};
use quadwarp_image::{ImageError, ImageSize};

use crate::error::WarpError;

// beyond 2^53 f64 no longer holds every integer
pub(super) const MAX_COORDINATE: f64 = 9_007_199_254_740_992.0;

/// Snap values within rounding noise of an integer onto it, so that floor and
/// ceil do not grow the canvas by a pixel.
fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() <= 1e-9 * r.abs().max(1.0) {
        r
    } else {
        v
    }
}

/// Placement of a warped image on its canvas.
///
/// `min_x` and `min_y` are the destination coordinates of the canvas origin,
/// which may be negative when part of the image lands left of or above the
/// destination origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasBounds {
    /// destination x coordinate of the canvas left edge
    pub min_x: i64,
    /// destination y coordinate of the canvas top edge
    pub min_y: i64,
    /// canvas width in pixels
    pub width: usize,
    /// canvas height in pixels
    pub height: usize,
}

impl CanvasBounds {
    /// The canvas size.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Number of pixels on the canvas.
    pub fn area(&self) -> usize {
        self.size().area()
    }

    /// Translation taking destination coordinates to canvas coordinates.
    pub fn offset_transform(&self) -> Homography {
        Homography::from_translation(-self.min_x as f64, -self.min_y as f64)
    }
}

/// Compute the integer canvas holding an image of `size` warped by `h`.
///
/// The image corners `(0, 0), (w, 0), (w, h), (0, h)` are projected through
/// `h`; the canvas spans the floor of their minimum to the ceil of their
/// maximum and is at least one pixel wide and high.
///
/// # Arguments
///
/// * `h` - The transform applied to the image.
/// * `size` - The size of the image before warping.
/// * `max_area` - Largest canvas, in pixels, that may be returned.
///
/// # Errors
///
/// * [`WarpError::UnboundedCanvas`] if some corner reaches or crosses the
///   line at infinity.
/// * [`WarpError::CanvasTooLarge`] if the canvas has more than `max_area`
///   pixels.
///
/// # Example
///
/// ```
/// use quadwarp_geometry::Homography;
/// use quadwarp_imgproc::warp::canvas_bounds;
///
/// let h = Homography::from_translation(-5.5, 3.0);
/// let bounds = canvas_bounds(&h, [10, 10].into(), 1_000).unwrap();
///
/// assert_eq!((bounds.min_x, bounds.min_y), (-6, 3));
/// assert_eq!((bounds.width, bounds.height), (11, 10));
/// ```
pub fn canvas_bounds(
    h: &Homography,
    size: ImageSize,
    max_area: usize,
) -> Result<CanvasBounds, WarpError> {
    if size.is_empty() {
        return Err(ImageError::ZeroSizedImage(size.width, size.height).into());
    }

    let corners = Quad::from_size(size.width as f64, size.height as f64);
    let projected = corners.points().map(|p| h.transform_homogeneous(p));

    // every corner must stay strictly on the same side of the horizon
    let w_max = projected.iter().fold(0.0f64, |acc, p| acc.max(p[2].abs()));
    let w_eps = w_max * 1e-12;
    let all_positive = projected.iter().all(|p| p[2] > w_eps);
    let all_negative = projected.iter().all(|p| p[2] < -w_eps);
    if !(all_positive || all_negative) {
        return Err(WarpError::UnboundedCanvas);
    }

    let points = projected.map(|[x, y, w]| Point2d::new(x / w, y / w));

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points.iter() {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let (min_x, min_y) = (snap(min_x).floor(), snap(min_y).floor());
    let (max_x, max_y) = (snap(max_x).ceil(), snap(max_y).ceil());

    let in_range = |v: f64| v.is_finite() && v.abs() < MAX_COORDINATE;
    if ![min_x, min_y, max_x, max_y].into_iter().all(in_range) {
        return Err(WarpError::UnboundedCanvas);
    }

    let width = (max_x - min_x).max(1.0);
    let height = (max_y - min_y).max(1.0);

    if width * height > max_area as f64 {
        log::warn!("canvas of {width}x{height} pixels exceeds the limit of {max_area}");
        return Err(WarpError::CanvasTooLarge {
            width: width as usize,
            height: height as usize,
            max_area,
        });
    }

    let bounds = CanvasBounds {
        min_x: min_x as i64,
        min_y: min_y as i64,
        width: width as usize,
        height: height as usize,
    };

    log::trace!("canvas bounds for {size}: {bounds:?}");

    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadwarp_geometry::ErrorKind;

    const MAX_AREA: usize = 100_000_000;

    #[test]
    fn identity_keeps_size() -> Result<(), WarpError> {
        let bounds = canvas_bounds(&Homography::identity(), [10, 8].into(), MAX_AREA)?;
        assert_eq!(
            bounds,
            CanvasBounds {
                min_x: 0,
                min_y: 0,
                width: 10,
                height: 8
            }
        );
        assert_eq!(bounds.area(), 80);
        assert_eq!(bounds.offset_transform(), Homography::identity());
        Ok(())
    }

    #[test]
    fn fractional_translation_rounds_outwards() -> Result<(), WarpError> {
        let h = Homography::from_translation(-5.5, 3.2);
        let bounds = canvas_bounds(&h, [100, 100].into(), MAX_AREA)?;
        assert_eq!((bounds.min_x, bounds.min_y), (-6, 3));
        assert_eq!(bounds.size(), [101, 101].into());
        assert_eq!(bounds.offset_transform(), Homography::from_translation(6.0, -3.0));
        Ok(())
    }

    #[test]
    fn perspective_contains_corners() -> Result<(), WarpError> {
        let h = Homography::from_rows([[1.2, 0.1, 4.0], [-0.05, 0.9, -7.0], [0.001, 0.0005, 1.0]]);
        let size = ImageSize {
            width: 64,
            height: 48,
        };
        let bounds = canvas_bounds(&h, size, MAX_AREA)?;
        let corners = Quad::from_size(64.0, 48.0);
        let shifted = h.then_translate(-bounds.min_x as f64, -bounds.min_y as f64);
        for p in corners.points() {
            let q = shifted.transform_point(*p).ok_or(WarpError::UnboundedCanvas)?;
            assert!(q.x >= 0.0 && q.x <= bounds.width as f64);
            assert!(q.y >= 0.0 && q.y <= bounds.height as f64);
        }
        Ok(())
    }

    #[test]
    fn snaps_rounding_noise() -> Result<(), WarpError> {
        let h = Homography::from_rows([
            [1.0 + 1e-15, 0.0, -1e-13],
            [0.0, 1.0, 1e-13],
            [0.0, 0.0, 1.0],
        ]);
        let bounds = canvas_bounds(&h, [10, 8].into(), MAX_AREA)?;
        assert_eq!((bounds.min_x, bounds.min_y), (0, 0));
        assert_eq!(bounds.size(), [10, 8].into());
        assert_eq!(snap(2.5), 2.5);
        Ok(())
    }

    #[test]
    fn collapsed_image_gets_one_pixel() -> Result<(), WarpError> {
        let h = Homography::from_rows([[0.0, 0.0, 5.0], [0.0, 0.0, 5.0], [0.0, 0.0, 1.0]]);
        let bounds = canvas_bounds(&h, [10, 10].into(), MAX_AREA)?;
        assert_eq!(bounds.size(), [1, 1].into());
        Ok(())
    }

    #[test]
    fn too_large() {
        let h = Homography::from_rows([[100.0, 0.0, 0.0], [0.0, 100.0, 0.0], [0.0, 0.0, 1.0]]);
        let res = canvas_bounds(&h, [100, 100].into(), 1_000_000);
        assert_eq!(
            res,
            Err(WarpError::CanvasTooLarge {
                width: 10_000,
                height: 10_000,
                max_area: 1_000_000
            })
        );
    }

    #[test]
    fn straddles_horizon() {
        let h = Homography::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.01, 0.0, -0.5]]);
        let res = canvas_bounds(&h, [100, 100].into(), MAX_AREA);
        assert_eq!(res, Err(WarpError::UnboundedCanvas));
        assert_eq!(WarpError::UnboundedCanvas.kind(), ErrorKind::CanvasTooLarge);
    }

    #[test]
    fn empty_image() {
        let res = canvas_bounds(&Homography::identity(), [0, 10].into(), MAX_AREA);
        assert_eq!(res.map_err(|e| e.kind()), Err(ErrorKind::InvalidInput));
    }
}
