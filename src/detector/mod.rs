//! Staff-line detector orchestrating page preparation and the line pipeline.
//!
//! Overview
//! - Normalizes the page, stretches contrast when it has mid-tones and
//!   binarizes it.
//! - Measures staff-line and staff-space height from vertical runs and keeps
//!   long horizontal runs of the ink without tall vertical structure.
//! - Extracts components, links them into lines and prunes fragments.
//! - Runs the stage plan: grouping into systems, intensity pruning, line
//!   extension, post-processing on the binarized page, smoothing and fitting.
//!
//! Modules
//! - [`params`] – configuration types used by the detector and CLI.
//! - `data` – the per-page [`ImageData`] aggregate.
//! - `stages` – the [`Stage`] plan built once from the parameters.
//! - `pipeline` – the main [`StaffLineDetector`] implementation.
//!
//! Key Ideas
//! - Every tolerance scales with the measured staff geometry.
//! - Stages never fail: degenerate input produces fewer or no systems.
//! - A pixel classifier can replace the run-length image through
//!   [`StaffLineDetector::detect_with_classifier`].

mod data;
pub mod params;
mod pipeline;
mod stages;

pub use data::ImageData;
pub use params::DetectorParams;
pub use pipeline::StaffLineDetector;
pub use stages::{build_plan, Stage};
