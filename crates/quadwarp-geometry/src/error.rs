/// Coarse classification of every error the engine can report.
///
/// Callers that only need to decide how to react (ask the user to re-pick
/// points, shrink the output, ...) can match on this instead of the
/// individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong point count, non-finite coordinates or empty images.
    InvalidInput,
    /// The correspondences do not admit a well-conditioned projective solution.
    DegenerateTransform,
    /// The warped output would exceed the configured canvas limit.
    CanvasTooLarge,
}

/// An error type for the geometry module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeometryError {
    /// The number of points is not the one the operation requires.
    #[error("Expected {expected} points, got {actual}")]
    InvalidPointCount {
        /// number of points required
        expected: usize,
        /// number of points given
        actual: usize,
    },

    /// The source and destination point sets have different lengths.
    #[error("Source has {0} points but destination has {1}")]
    MismatchedPointCount(usize, usize),

    /// A point has a NaN or infinite coordinate.
    #[error("Point {index} is not finite ({x}, {y})")]
    NonFinitePoint {
        /// position of the point in its input slice
        index: usize,
        /// x coordinate
        x: f64,
        /// y coordinate
        y: f64,
    },

    /// The transform is singular or too ill-conditioned to be trusted.
    #[error("Degenerate transform: {0}")]
    DegenerateTransform(String),
}

impl GeometryError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeometryError::DegenerateTransform(_) => ErrorKind::DegenerateTransform,
            _ => ErrorKind::InvalidInput,
        }
    }
}
