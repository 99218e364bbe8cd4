use serde::{Deserialize, Serialize};

use crate::{error::WarpError, interpolation::InterpolationMode};

/// Knobs shared by the high level warp operations.
///
/// Deserializes from partial documents: missing fields take their defaults.
///
/// # Example
///
/// ```
/// use quadwarp_imgproc::{interpolation::InterpolationMode, WarpConfig};
///
/// let config = WarpConfig::default()
///     .with_fill_color([0, 0, 0])
///     .with_interpolation(InterpolationMode::Nearest);
///
/// assert_eq!(config.fill_color, [0, 0, 0]);
/// assert_eq!(config.singularity_tolerance, 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpConfig {
    /// Color written where the output has no source pixel.
    pub fill_color: [u8; 3],
    /// Degeneracy threshold, applied to Hartley-normalised coordinates so it
    /// does not depend on the magnitude of the pixel coordinates.
    pub singularity_tolerance: f64,
    /// Largest canvas, in pixels, a full-canvas warp may allocate.
    pub max_canvas_area: usize,
    /// Resampling kernel.
    pub interpolation: InterpolationMode,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            fill_color: [255, 255, 255],
            singularity_tolerance: 1e-6,
            max_canvas_area: 100_000_000,
            interpolation: InterpolationMode::Bilinear,
        }
    }
}

impl WarpConfig {
    /// Set the fill color.
    pub fn with_fill_color(mut self, fill_color: [u8; 3]) -> Self {
        self.fill_color = fill_color;
        self
    }

    /// Set the degeneracy threshold.
    pub fn with_singularity_tolerance(mut self, tolerance: f64) -> Self {
        self.singularity_tolerance = tolerance;
        self
    }

    /// Set the canvas area ceiling.
    pub fn with_max_canvas_area(mut self, max_canvas_area: usize) -> Self {
        self.max_canvas_area = max_canvas_area;
        self
    }

    /// Set the resampling kernel.
    pub fn with_interpolation(mut self, interpolation: InterpolationMode) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<(), WarpError> {
        if !self.singularity_tolerance.is_finite() || self.singularity_tolerance <= 0.0 {
            return Err(WarpError::InvalidConfig(format!(
                "singularity_tolerance must be a positive number, got {}",
                self.singularity_tolerance
            )));
        }
        if self.max_canvas_area == 0 {
            return Err(WarpError::InvalidConfig(
                "max_canvas_area must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
