use crate::error::GeometryError;
use crate::linalg::{self, Mat33};
use crate::point::{check_finite, Point2d};

/// A projective transform of the plane.
///
/// The matrix is row-major and maps source homogeneous coordinates
/// `[x, y, 1]` to destination homogeneous coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography(Mat33);

impl Default for Homography {
    fn default() -> Self {
        Self::identity()
    }
}

impl Homography {
    /// The identity transform.
    pub const fn identity() -> Self {
        Self(linalg::IDENTITY)
    }

    /// Wrap a row-major 3x3 matrix.
    pub const fn from_rows(m: Mat33) -> Self {
        Self(m)
    }

    /// A pure translation by `(tx, ty)`.
    pub const fn from_translation(tx: f64, ty: f64) -> Self {
        Self([[1.0, 0.0, tx], [0.0, 1.0, ty], [0.0, 0.0, 1.0]])
    }

    /// The underlying row-major matrix.
    pub fn as_rows(&self) -> &Mat33 {
        &self.0
    }

    /// Determinant of the matrix.
    pub fn determinant(&self) -> f64 {
        linalg::det_mat33(&self.0)
    }

    /// The inverse transform.
    ///
    /// # Errors
    ///
    /// Fails with [`GeometryError::DegenerateTransform`] if the matrix is
    /// singular. The determinant is measured against the product of the
    /// column norms, which bounds it, so neither the overall scale nor a
    /// large translation makes a well-conditioned transform look singular.
    pub fn inverse(&self) -> Result<Self, GeometryError> {
        let eps = linalg::column_norms_product_mat33(&self.0) * 1e-12;
        linalg::inverse_mat33(&self.0, eps)
            .map(Self)
            .ok_or_else(|| GeometryError::DegenerateTransform("matrix is not invertible".into()))
    }

    /// The transform that applies `other` first and then `self`.
    pub fn compose(&self, other: &Homography) -> Self {
        Self(linalg::mul_mat33(&self.0, &other.0))
    }

    /// The transform that applies `self` and then translates by `(tx, ty)`.
    pub fn then_translate(&self, tx: f64, ty: f64) -> Self {
        Self::from_translation(tx, ty).compose(self)
    }

    /// Map a point to homogeneous destination coordinates without dividing.
    pub fn transform_homogeneous(&self, p: Point2d) -> [f64; 3] {
        linalg::mat33_mul_vec3(&self.0, &[p.x, p.y, 1.0])
    }

    /// Map a point through the transform.
    ///
    /// Returns `None` when the point lands on the line at infinity.
    pub fn transform_point(&self, p: Point2d) -> Option<Point2d> {
        let [x, y, w] = self.transform_homogeneous(p);
        if w.abs() < f64::EPSILON {
            return None;
        }
        let out = Point2d::new(x / w, y / w);
        out.is_finite().then_some(out)
    }

    /// Map a set of points through the transform.
    pub fn transform_points(&self, points: &[Point2d]) -> Vec<Option<Point2d>> {
        points.iter().map(|p| self.transform_point(*p)).collect()
    }
}

/// Hartley normalisation: move the centroid to the origin and scale so the
/// mean distance to it is sqrt(2).
fn normalize_points(points: &[Point2d]) -> (Vec<Point2d>, Mat33) {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / n;

    let mean_dist = points
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;

    let s = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    let normalized = points
        .iter()
        .map(|p| Point2d::new(s * (p.x - cx), s * (p.y - cy)))
        .collect();

    let t = [[s, 0.0, -s * cx], [0.0, s, -s * cy], [0.0, 0.0, 1.0]];

    (normalized, t)
}

/// Inverse of a normalisation matrix built by [`normalize_points`].
fn denormalization(t: &Mat33) -> Mat33 {
    let s = t[0][0];
    [
        [1.0 / s, 0.0, -t[0][2] / s],
        [0.0, 1.0 / s, -t[1][2] / s],
        [0.0, 0.0, 1.0],
    ]
}

fn check_no_collinear_triple(
    points: &[Point2d],
    tolerance: f64,
    which: &str,
) -> Result<(), GeometryError> {
    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];

    for [i, j, k] in TRIPLES {
        let (a, b, c) = (points[i], points[j], points[k]);
        let area2 = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        if area2.abs() < tolerance {
            return Err(GeometryError::DegenerateTransform(format!(
                "{which} points {i}, {j} and {k} are collinear"
            )));
        }
    }

    Ok(())
}

/// Solve `A h = 0` for the stacked DLT system and return the null vector.
fn solve_dlt(src: &[Point2d], dst: &[Point2d], tolerance: f64) -> Result<Mat33, GeometryError> {
    let mut rows = Vec::with_capacity(2 * src.len());
    for (p, q) in src.iter().zip(dst.iter()) {
        rows.push([p.x, p.y, 1.0, 0.0, 0.0, 0.0, -q.x * p.x, -q.x * p.y, -q.x]);
        rows.push([0.0, 0.0, 0.0, p.x, p.y, 1.0, -q.y * p.x, -q.y * p.y, -q.y]);
    }

    // pad with zero rows so the SVD always yields nine singular values
    let nrows = rows.len().max(9);
    let mat_a = faer::Mat::<f64>::from_fn(nrows, 9, |i, j| rows.get(i).map_or(0.0, |r| r[j]));

    let svd = mat_a.svd();
    let s = svd.s_diagonal();

    // a unique solution needs rank 8: the second smallest singular value must not vanish
    let (s_max, s_rank) = (s[0], s[7]);
    if s_max <= 0.0 || s_rank / s_max < tolerance {
        return Err(GeometryError::DegenerateTransform(format!(
            "correspondences are rank deficient (singular value ratio {:e})",
            s_rank / s_max
        )));
    }

    let h = svd.v().col(8);

    Ok([[h[0], h[1], h[2]], [h[3], h[4], h[5]], [h[6], h[7], h[8]]])
}

/// Degeneracy checks and DLT solve in normalised coordinates.
fn solve_normalized(
    src_n: &[Point2d],
    dst_n: &[Point2d],
    tolerance: f64,
) -> Result<Mat33, GeometryError> {
    if src_n.len() == 4 {
        check_no_collinear_triple(src_n, tolerance, "source")?;
        check_no_collinear_triple(dst_n, tolerance, "destination")?;
    }

    let hn = solve_dlt(src_n, dst_n, tolerance)?;

    let det = linalg::det_mat33(&hn);
    if det.abs() < tolerance {
        return Err(GeometryError::DegenerateTransform(format!(
            "solution is singular (det {det:e})"
        )));
    }

    Ok(hn)
}

/// Scale so `h[2][2] == 1`, falling back to unit Frobenius norm when that
/// entry vanishes.
fn normalize_scale(h: Mat33) -> Mat33 {
    let norm = linalg::frobenius_norm_mat33(&h);
    let scale = if h[2][2].abs() > norm * 1e-12 {
        h[2][2]
    } else {
        norm
    };
    h.map(|row| row.map(|v| v / scale))
}

/// Estimate the homography mapping `src` points onto `dst` points.
///
/// Uses the normalised direct linear transform: both point sets are
/// Hartley-normalised, the `2N x 9` system is solved by SVD and the result is
/// denormalised and scaled so that `h[2][2] == 1`. With exactly four
/// correspondences the solution is exact; with more it is the algebraic
/// least-squares fit.
///
/// # Arguments
///
/// * `src` - The source points, at least four.
/// * `dst` - The destination points, same length as `src`.
/// * `tolerance` - Degeneracy threshold applied in normalised coordinates.
///
/// # Errors
///
/// * [`GeometryError::InvalidPointCount`] with fewer than four points.
/// * [`GeometryError::MismatchedPointCount`] when the lengths differ.
/// * [`GeometryError::NonFinitePoint`] on NaN or infinite coordinates.
/// * [`GeometryError::DegenerateTransform`] when three of four points are
///   collinear, the system is rank deficient or the solution is singular.
///
/// # Example
///
/// ```
/// use quadwarp_geometry::{find_homography, Point2d, Quad};
///
/// let src = Quad::from_size(100.0, 100.0);
/// let dst = Quad::from_size(50.0, 50.0);
///
/// let h = find_homography(src.points(), dst.points(), 1e-6).unwrap();
/// let p = h.transform_point(Point2d::new(100.0, 50.0)).unwrap();
/// assert!((p.x - 50.0).abs() < 1e-9 && (p.y - 25.0).abs() < 1e-9);
/// ```
pub fn find_homography(
    src: &[Point2d],
    dst: &[Point2d],
    tolerance: f64,
) -> Result<Homography, GeometryError> {
    if src.len() != dst.len() {
        return Err(GeometryError::MismatchedPointCount(src.len(), dst.len()));
    }

    if src.len() < 4 {
        return Err(GeometryError::InvalidPointCount {
            expected: 4,
            actual: src.len(),
        });
    }

    check_finite(src)?;
    check_finite(dst)?;

    let (src_n, t_src) = normalize_points(src);
    let (dst_n, t_dst) = normalize_points(dst);

    let hn = match solve_normalized(&src_n, &dst_n, tolerance) {
        Ok(hn) => hn,
        Err(err) => {
            log::warn!("rejecting homography: {err}");
            return Err(err);
        }
    };

    // H = T_dst^-1 * Hn * T_src
    let h = linalg::mul_mat33(&linalg::mul_mat33(&denormalization(&t_dst), &hn), &t_src);
    let h = Homography(normalize_scale(h));

    log::debug!("homography from {} correspondences: {:?}", src.len(), h.0);

    Ok(h)
}
