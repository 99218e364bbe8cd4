use quadwarp_geometry::{ErrorKind, GeometryError, Rect};
use quadwarp_image::{ImageError, ImageSize};

/// An error type for the warp operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WarpError {
    /// Error related to the image buffers.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error related to the point sets or the transform.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The requested template has zero width or height.
    #[error("Template size must be non-zero, got {0}")]
    InvalidTemplateSize(ImageSize),

    /// The region of interest does not cover any pixel.
    #[error("Region of interest {0:?} is empty")]
    EmptyRoi(Rect),

    /// The region of interest lies beyond representable pixel coordinates.
    #[error("Region of interest {0:?} is out of range")]
    InvalidRoi(Rect),

    /// The overlay opacity is outside `[0, 1]`.
    #[error("Opacity must be within [0, 1], got {0}")]
    InvalidOpacity(f32),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The output canvas would be larger than allowed.
    #[error("Canvas of {width}x{height} pixels exceeds the limit of {max_area} pixels")]
    CanvasTooLarge {
        /// requested canvas width
        width: usize,
        /// requested canvas height
        height: usize,
        /// configured pixel-area ceiling
        max_area: usize,
    },

    /// Part of the image is sent to the line at infinity.
    #[error("Warped image is unbounded")]
    UnboundedCanvas,
}

impl WarpError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WarpError::Geometry(err) => err.kind(),
            WarpError::CanvasTooLarge { .. } | WarpError::UnboundedCanvas => {
                ErrorKind::CanvasTooLarge
            }
            WarpError::Image(_)
            | WarpError::InvalidTemplateSize(_)
            | WarpError::EmptyRoi(_)
            | WarpError::InvalidRoi(_)
            | WarpError::InvalidOpacity(_)
            | WarpError::InvalidConfig(_) => ErrorKind::InvalidInput,
        }
    }
}
