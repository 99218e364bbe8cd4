#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// blending and superimposition of images.
pub mod blend;

/// warp configuration.
pub mod config;

/// image cropping module.
pub mod crop;

/// Error types for the warp operations.
pub mod error;

/// utilities for interpolation.
pub mod interpolation;

/// module containing parallelization utilities.
pub mod parallel;

/// image geometric transformations module.
pub mod warp;

pub use crate::config::WarpConfig;
pub use crate::error::WarpError;
