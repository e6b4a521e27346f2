use serde::{Deserialize, Serialize};

/// Options of the organizer, the intensity pruner and the normalizer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemOptions {
    /// Allowed deviation from the expected line distance, in staff spaces.
    pub spacing_tolerance: f32,
    /// Systems below this fraction of the median system intensity are dropped.
    pub min_relative_intensity: f32,
    /// Columns used to extrapolate line ends, in staff spaces.
    pub extrapolation_factor: f32,
}

impl Default for SystemOptions {
    fn default() -> Self {
        Self {
            spacing_tolerance: 0.5,
            min_relative_intensity: 0.5,
            extrapolation_factor: 2.0,
        }
    }
}

/// Options of the post-processing trace on the binarized page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostprocessOptions {
    /// Columns without ink tolerated while tracing, in staff spaces.
    pub max_gap_factor: f32,
}

impl Default for PostprocessOptions {
    fn default() -> Self {
        Self {
            max_gap_factor: 0.5,
        }
    }
}
