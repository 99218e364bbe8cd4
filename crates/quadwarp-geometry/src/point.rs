use crate::error::GeometryError;

/// A 2d point in image pixel space.
///
/// Coordinates follow the pixel-edge convention: pixel `(i, j)` covers the
/// square `[i, i + 1) x [j, j + 1)` and an image of size `w x h` spans
/// `[0, w] x [0, h]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2d {
    /// horizontal coordinate, growing to the right
    pub x: f64,
    /// vertical coordinate, growing downwards
    pub y: f64,
}

impl Point2d {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point2d {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

impl From<(f64, f64)> for Point2d {
    fn from(p: (f64, f64)) -> Self {
        Self::new(p.0, p.1)
    }
}

impl From<Point2d> for [f64; 2] {
    fn from(p: Point2d) -> Self {
        [p.x, p.y]
    }
}

/// Axis-aligned rectangle, typically a rubber-band ROI selection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// left edge
    pub x: f64,
    /// top edge
    pub y: f64,
    /// horizontal extent
    pub width: f64,
    /// vertical extent
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle from its top-left corner and extent.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create the rectangle spanned by two opposite corners, in any order.
    pub fn from_corners(a: Point2d, b: Point2d) -> Self {
        let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
        let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// A quadrilateral given by exactly four corners.
///
/// Quads produced by [`crate::order_points`] or [`Quad::from_rect`] are in
/// top-left, top-right, bottom-right, bottom-left order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad(pub [Point2d; 4]);

impl Quad {
    /// Create a quad from four corners, keeping their order.
    pub fn new(points: [Point2d; 4]) -> Self {
        Self(points)
    }

    /// The four corners of a rectangle in TL/TR/BR/BL order.
    ///
    /// # Example
    ///
    /// ```
    /// use quadwarp_geometry::{Point2d, Quad, Rect};
    ///
    /// let quad = Quad::from_rect(Rect::new(10.0, 20.0, 30.0, 40.0));
    /// assert_eq!(quad.points()[2], Point2d::new(40.0, 60.0));
    /// ```
    pub fn from_rect(rect: Rect) -> Self {
        Self([
            Point2d::new(rect.x, rect.y),
            Point2d::new(rect.right(), rect.y),
            Point2d::new(rect.right(), rect.bottom()),
            Point2d::new(rect.x, rect.bottom()),
        ])
    }

    /// The corners of a `width x height` image, `(0, 0)` to `(width, height)`.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::from_rect(Rect::new(0.0, 0.0, width, height))
    }

    /// The corners as a slice.
    pub fn points(&self) -> &[Point2d; 4] {
        &self.0
    }

    /// The same corners reordered to TL/TR/BR/BL.
    ///
    /// See [`crate::order_points`] for the heuristic and its limits.
    pub fn ordered(&self) -> Quad {
        crate::order::order_quad(&self.0)
    }
}

impl TryFrom<&[Point2d]> for Quad {
    type Error = GeometryError;

    fn try_from(points: &[Point2d]) -> Result<Self, Self::Error> {
        let points: [Point2d; 4] =
            points
                .try_into()
                .map_err(|_| GeometryError::InvalidPointCount {
                    expected: 4,
                    actual: points.len(),
                })?;
        Ok(Self(points))
    }
}

impl std::ops::Index<usize> for Quad {
    type Output = Point2d;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Check that every point has finite coordinates.
pub(crate) fn check_finite(points: &[Point2d]) -> Result<(), GeometryError> {
    match points.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        Some((index, p)) => Err(GeometryError::NonFinitePoint {
            index,
            x: p.x,
            y: p.y,
        }),
        None => Ok(()),
    }
}
