use quadwarp_geometry::{find_homography, order_points, Homography, Point2d, Quad, Rect};
use quadwarp_image::{Image, ImageError, ImageSize, RgbImage};

use super::{canvas::MAX_COORDINATE, canvas_bounds, warp_perspective, CanvasBounds};
use crate::{config::WarpConfig, error::WarpError};

/// The result of a full-canvas warp.
#[derive(Debug, Clone, PartialEq)]
pub struct FullWarp {
    /// the warped image, sized to hold every source pixel
    pub image: RgbImage,
    /// where the canvas sits in destination coordinates
    pub bounds: CanvasBounds,
    /// the transform from source pixels to canvas pixels
    pub transform: Homography,
}

fn check_image(image: &RgbImage) -> Result<(), WarpError> {
    if image.size().is_empty() {
        return Err(ImageError::ZeroSizedImage(image.width(), image.height()).into());
    }
    Ok(())
}

/// Resample `image` onto a fresh canvas of `size` filled with the fill color.
fn resample(
    image: &RgbImage,
    h: &Homography,
    size: ImageSize,
    config: &WarpConfig,
) -> Result<RgbImage, WarpError> {
    let mut dst = Image::from_size_pixel(size, config.fill_color)?;
    warp_perspective(image, &mut dst, h, config.interpolation, config.fill_color)?;
    Ok(dst)
}

/// Warp a quadrilateral region of an image onto an axis-aligned template.
///
/// The four `source` points may come in any order; they are sorted into
/// top-left, top-right, bottom-right, bottom-left and mapped onto the template
/// corners `(0, 0), (W, 0), (W, H), (0, H)`.
///
/// # Arguments
///
/// * `image` - The image to warp.
/// * `source` - Four points outlining the region in `image`.
/// * `template` - The size of the output image.
/// * `config` - Fill color, degeneracy tolerance and interpolation.
///
/// # Returns
///
/// An image of exactly `template` size. Pixels mapping outside `image` get
/// the fill color.
///
/// # Errors
///
/// Fails on a point count other than four, non-finite points, an empty
/// image or template, a degenerate source quad, or a template with more
/// than `config.max_canvas_area` pixels.
///
/// # Example
///
/// ```
/// use quadwarp_geometry::Point2d;
/// use quadwarp_image::RgbImage;
/// use quadwarp_imgproc::{warp::warp_to_template, WarpConfig};
///
/// let image = RgbImage::from_size_val([100, 100].into(), 0).unwrap();
/// let source = [
///     Point2d::new(100.0, 100.0),
///     Point2d::new(0.0, 0.0),
///     Point2d::new(100.0, 0.0),
///     Point2d::new(0.0, 100.0),
/// ];
///
/// let warped = warp_to_template(&image, &source, [50, 50].into(), &WarpConfig::default()).unwrap();
/// assert_eq!(warped.size(), [50, 50].into());
/// ```
pub fn warp_to_template(
    image: &RgbImage,
    source: &[Point2d],
    template: ImageSize,
    config: &WarpConfig,
) -> Result<RgbImage, WarpError> {
    config.validate()?;

    if template.is_empty() {
        return Err(WarpError::InvalidTemplateSize(template));
    }
    if template.area() > config.max_canvas_area {
        log::warn!("template {template} exceeds the limit of {}", config.max_canvas_area);
        return Err(WarpError::CanvasTooLarge {
            width: template.width,
            height: template.height,
            max_area: config.max_canvas_area,
        });
    }
    check_image(image)?;

    let ordered = order_points(source)?;
    let corners = Quad::from_size(template.width as f64, template.height as f64);
    let h = find_homography(
        ordered.points(),
        corners.points(),
        config.singularity_tolerance,
    )?;

    log::debug!(
        "warping {} onto template {} via {:?}",
        image.size(),
        template,
        h.as_rows()
    );

    resample(image, &h, template, config)
}

/// Warp an axis-aligned region of interest onto a template of the same size.
///
/// The template size is the rectangle extent rounded to whole pixels, at
/// least one pixel on each side.
///
/// # Errors
///
/// Fails with [`WarpError::EmptyRoi`] when the rectangle has no positive
/// extent, with [`WarpError::InvalidRoi`] when a corner is not finite or lies
/// beyond 2^53, otherwise as [`warp_to_template`].
pub fn warp_roi(image: &RgbImage, rect: Rect, config: &WarpConfig) -> Result<RgbImage, WarpError> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return Err(WarpError::EmptyRoi(rect));
    }

    let in_range = |v: f64| v.is_finite() && v.abs() < MAX_COORDINATE;
    let corners = [rect.x, rect.y, rect.x + rect.width, rect.y + rect.height];
    if !corners.into_iter().all(in_range) {
        return Err(WarpError::InvalidRoi(rect));
    }

    let template = ImageSize {
        width: rect.width.round().max(1.0) as usize,
        height: rect.height.round().max(1.0) as usize,
    };

    warp_to_template(image, Quad::from_rect(rect).points(), template, config)
}

/// Warp a whole image so that `source` points land on `destination` points.
///
/// Unlike [`warp_to_template`] the output is not clipped: the canvas is grown
/// or shrunk to hold the complete warped image, see [`canvas_bounds`]. The
/// points are used in the given order.
///
/// # Arguments
///
/// * `image` - The image to warp.
/// * `source` - At least four points in `image`.
/// * `destination` - The matching destination points.
/// * `config` - Fill color, tolerance, canvas ceiling and interpolation.
///
/// # Errors
///
/// Fails on invalid or degenerate correspondences, an empty image, or a
/// canvas that is unbounded or larger than `config.max_canvas_area`.
pub fn warp_full(
    image: &RgbImage,
    source: &[Point2d],
    destination: &[Point2d],
    config: &WarpConfig,
) -> Result<FullWarp, WarpError> {
    config.validate()?;
    check_image(image)?;

    let h = find_homography(source, destination, config.singularity_tolerance)?;
    let bounds = canvas_bounds(&h, image.size(), config.max_canvas_area)?;
    let transform = bounds.offset_transform().compose(&h);

    log::debug!(
        "warping {} onto a {}x{} canvas at ({}, {})",
        image.size(),
        bounds.width,
        bounds.height,
        bounds.min_x,
        bounds.min_y
    );

    let warped = resample(image, &transform, bounds.size(), config)?;

    Ok(FullWarp {
        image: warped,
        bounds,
        transform,
    })
}
