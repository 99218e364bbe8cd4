#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the geometry module.
pub mod error;

/// Homography estimation and application.
pub mod homography;

/// Small fixed-size linear algebra helpers.
pub mod linalg;

/// Canonical ordering of quadrilateral corners.
pub mod order;

/// Point, quad and rectangle primitives.
pub mod point;

pub use crate::error::{ErrorKind, GeometryError};
pub use crate::homography::{find_homography, Homography};
pub use crate::order::order_points;
pub use crate::point::{Point2d, Quad, Rect};
