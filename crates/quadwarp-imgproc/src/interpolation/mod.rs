//! Pixel interpolation methods for image transformations.
//!
//! Coordinates passed to the kernels are in pixel-index space: the center of
//! pixel `(i, j)` sits at `(i, j)`. Samples outside the image are clamped to
//! the nearest edge pixel.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between adjacent pixels

mod bilinear;
mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, InterpolationMode};
