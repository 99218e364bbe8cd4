use crate::error::GeometryError;
use crate::point::{check_finite, Point2d, Quad};

/// Order four unordered points as top-left, top-right, bottom-right, bottom-left.
///
/// Each point is projected onto the two image diagonals: the smallest `x + y`
/// is the top-left corner, the largest the bottom-right; the smallest `y - x`
/// is the top-right corner, the largest the bottom-left. Ties go to the point
/// that comes first in `points`.
///
/// This is a heuristic: it is exact for convex quads rotated less than 45
/// degrees from the image axes. Collinear or repeated points still return a
/// quad, but the ordering is unspecified and may repeat a corner.
///
/// # Arguments
///
/// * `points` - Exactly four points in any order.
///
/// # Errors
///
/// Fails if `points` does not contain exactly four points or any coordinate
/// is not finite.
///
/// # Example
///
/// ```
/// use quadwarp_geometry::{order_points, Point2d};
///
/// let points = [
///     Point2d::new(100.0, 100.0),
///     Point2d::new(0.0, 0.0),
///     Point2d::new(100.0, 0.0),
///     Point2d::new(0.0, 100.0),
/// ];
///
/// let quad = order_points(&points).unwrap();
/// assert_eq!(quad[0], Point2d::new(0.0, 0.0));
/// assert_eq!(quad[1], Point2d::new(100.0, 0.0));
/// assert_eq!(quad[2], Point2d::new(100.0, 100.0));
/// assert_eq!(quad[3], Point2d::new(0.0, 100.0));
/// ```
pub fn order_points(points: &[Point2d]) -> Result<Quad, GeometryError> {
    let quad = Quad::try_from(points)?;
    check_finite(points)?;
    Ok(order_quad(quad.points()))
}

pub(crate) fn order_quad(points: &[Point2d; 4]) -> Quad {
    let sums = points.map(|p| p.x + p.y);
    let diffs = points.map(|p| p.y - p.x);

    Quad([
        points[argmin(&sums)],
        points[argmin(&diffs)],
        points[argmax(&sums)],
        points[argmax(&diffs)],
    ])
}

fn argmin(values: &[f64; 4]) -> usize {
    (1..4).fold(0, |best, i| if values[i] < values[best] { i } else { best })
}

fn argmax(values: &[f64; 4]) -> usize {
    (1..4).fold(0, |best, i| if values[i] > values[best] { i } else { best })
}
