#![doc = include_str!("../README.md")]

// Public modules (stable surface)
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod types;

// Stage-level building blocks, usable on their own.
pub mod components;
pub mod geometry;
pub mod lines;
pub mod preprocess;
pub mod runs;
pub mod smoothing;
pub mod systems;

// --- High-level re-exports -------------------------------------------------

pub use crate::detector::{DetectorParams, ImageData, StaffLineDetector};
pub use crate::error::ConfigError;
pub use crate::types::{Line, Point, StaffSystem};

pub use crate::diagnostics::{DetectionReport, PipelineTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use staffline_detector::prelude::*;
///
/// # fn main() -> Result<(), ConfigError> {
/// let (w, h) = (640usize, 480usize);
/// let gray = vec![255u8; w * h];
/// let img = ImageU8 { w, h, stride: w, data: &gray };
///
/// let det = StaffLineDetector::new(DetectorParams {
///     num_line: 4,
///     ..Default::default()
/// })?;
///
/// let systems = det.detect(img);
/// println!("systems={}", systems.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageU8;
    pub use crate::{ConfigError, DetectorParams, StaffLineDetector, StaffSystem};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::components::{extract_connected_components, normalize_connected_components};
    pub use crate::detector::{build_plan, Stage};
    pub use crate::lines::{connect_connected_components_to_line, filter_short_lines, prune_small_lines};
    pub use crate::runs::{horizontal_runs, suppress_vertical_structures, vertical_runs};
    pub use crate::smoothing::{line_fitting, smooth_lines, smooth_lines_advanced};
    pub use crate::systems::{
        normalize_lines_in_system, organize_lines_in_systems, postprocess_staff_systems,
        prune_lines_in_system_with_lowest_intensity,
    };
}
