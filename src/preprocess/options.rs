use serde::{Deserialize, Serialize};

/// Options of page preparation and component extraction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Ink belonging to vertical runs at least this tall is removed before
    /// the horizontal run filter (pixels).
    pub vertical_structure_height: usize,
    /// Percentile mapped to black by the contrast stretch.
    pub low_percentile: f32,
    /// Percentile mapped to white by the contrast stretch.
    pub high_percentile: f32,
    /// Runs on one row separated by at most this many pixels are merged.
    pub merge_gap: usize,
    /// Components with fewer pixels are ignored.
    pub min_component_pixels: usize,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            vertical_structure_height: 5,
            low_percentile: 1.0,
            high_percentile: 99.0,
            merge_gap: 1,
            min_component_pixels: 2,
        }
    }
}
