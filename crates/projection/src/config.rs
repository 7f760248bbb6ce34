//! Configuration for depth projection.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use u_cutlist_core::{Error, Result, MINIMAL_PATH_AREA};

/// Default depth quantization step (one micron in millimeter models).
pub const DEFAULT_DEPTH_QUANTUM: f64 = 1e-6;

/// Configuration parameters for the projection engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectionConfig {
    /// Move through-holes to a dedicated layer and fold deeper pockets into
    /// the layer above them.
    pub merge_holes: bool,

    /// Loops with an absolute area below this value are dropped from the output.
    pub min_area: f64,

    /// Step used to quantize depths into bucket keys.
    pub depth_quantum: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            merge_holes: false,
            min_area: MINIMAL_PATH_AREA,
            depth_quantum: DEFAULT_DEPTH_QUANTUM,
        }
    }
}

impl ProjectionConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables hole merging.
    pub fn with_merge_holes(mut self, merge: bool) -> Self {
        self.merge_holes = merge;
        self
    }

    /// Sets the minimal kept loop area.
    pub fn with_min_area(mut self, area: f64) -> Self {
        self.min_area = area;
        self
    }

    /// Sets the depth quantization step.
    pub fn with_depth_quantum(mut self, quantum: f64) -> Self {
        self.depth_quantum = quantum;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.depth_quantum.is_finite() && self.depth_quantum > 0.0) {
            return Err(Error::InvalidInput(format!(
                "depth quantum must be positive, got {}",
                self.depth_quantum
            )));
        }
        if !(self.min_area.is_finite() && self.min_area >= 0.0) {
            return Err(Error::InvalidInput(format!(
                "minimal area must be non-negative, got {}",
                self.min_area
            )));
        }
        Ok(())
    }
}
