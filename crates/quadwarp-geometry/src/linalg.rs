//! Row-major 3x3 matrix helpers used by the homography code.
//!
//! These stay on plain arrays; faer is only pulled in for the SVD.

/// A row-major 3x3 matrix.
pub type Mat33 = [[f64; 3]; 3];

/// The 3x3 identity matrix.
pub const IDENTITY: Mat33 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Determinant of a 3x3 matrix.
#[rustfmt::skip]
pub fn det_mat33(m: &Mat33) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]) -
    m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]) +
    m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Adjugate (transposed cofactor matrix) of a 3x3 matrix.
#[rustfmt::skip]
pub fn adjugate_mat33(m: &Mat33) -> Mat33 {
    [
        [
            m[1][1] * m[2][2] - m[1][2] * m[2][1],
            m[0][2] * m[2][1] - m[0][1] * m[2][2],
            m[0][1] * m[1][2] - m[0][2] * m[1][1],
        ],
        [
            m[1][2] * m[2][0] - m[1][0] * m[2][2],
            m[0][0] * m[2][2] - m[0][2] * m[2][0],
            m[0][2] * m[1][0] - m[0][0] * m[1][2],
        ],
        [
            m[1][0] * m[2][1] - m[1][1] * m[2][0],
            m[0][1] * m[2][0] - m[0][0] * m[2][1],
            m[0][0] * m[1][1] - m[0][1] * m[1][0],
        ],
    ]
}

/// Inverse of a 3x3 matrix, or `None` if the determinant is below `eps`
/// in absolute value or not finite.
pub fn inverse_mat33(m: &Mat33, eps: f64) -> Option<Mat33> {
    let det = det_mat33(m);
    if !det.is_finite() || det.abs() <= eps {
        return None;
    }

    let adj = adjugate_mat33(m);
    let inv_det = 1.0 / det;
    Some(adj.map(|row| row.map(|v| v * inv_det)))
}

/// Matrix product `a * b`.
pub fn mul_mat33(a: &Mat33, b: &Mat33) -> Mat33 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// Matrix-vector product `m * v`.
pub fn mat33_mul_vec3(m: &Mat33, v: &[f64; 3]) -> [f64; 3] {
    m.map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2])
}

/// Frobenius norm of a 3x3 matrix.
pub fn frobenius_norm_mat33(m: &Mat33) -> f64 {
    m.iter().flatten().map(|v| v * v).sum::<f64>().sqrt()
}

/// Product of the Euclidean norms of the columns of a 3x3 matrix.
///
/// By Hadamard's inequality this bounds the absolute determinant.
pub fn column_norms_product_mat33(m: &Mat33) -> f64 {
    (0..3)
        .map(|j| (m[0][j] * m[0][j] + m[1][j] * m[1][j] + m[2][j] * m[2][j]).sqrt())
        .product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn det_identity() {
        assert_eq!(det_mat33(&IDENTITY), 1.0);
    }

    #[test]
    fn inverse_roundtrip() {
        let m = [[2.0, 0.5, -3.0], [0.1, 1.5, 4.0], [0.001, 0.002, 1.0]];
        let inv = inverse_mat33(&m, 1e-12).unwrap();
        let prod = mul_mat33(&m, &inv);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(prod[i][j], IDENTITY[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn inverse_singular() {
        let m = [[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]];
        assert!(inverse_mat33(&m, 1e-12).is_none());
    }

    #[test]
    fn mul_vec() {
        let m = [[1.0, 0.0, 5.0], [0.0, 2.0, -1.0], [0.0, 0.0, 1.0]];
        assert_eq!(mat33_mul_vec3(&m, &[1.0, 1.0, 1.0]), [6.0, 1.0, 1.0]);
    }

    #[test]
    fn norms() {
        assert_relative_eq!(frobenius_norm_mat33(&IDENTITY), 3f64.sqrt());
        assert_relative_eq!(column_norms_product_mat33(&IDENTITY), 1.0);
        let m = [[3.0, 0.0, 5.0], [4.0, 2.0, 12.0], [0.0, 0.0, 0.0]];
        assert_relative_eq!(column_norms_product_mat33(&m), 5.0 * 2.0 * 13.0);
    }
}
