//! Staff systems: grouping, pruning and geometric refinement.
//!
//! Stages (in pipeline order)
//! - `organize`: groups pruned lines into systems of `num_line` lines with
//!   consistent spacing.
//! - `intensity`: drops systems whose lines are barely backed by ink in the
//!   run-length image.
//! - `normalize`: extends every line of a system to the system's common
//!   column range, snapping extrapolated samples to nearby ink.
//! - `postprocess`: recovers pieces lost to run-length filtering by tracing
//!   lines through the binarized page.

mod intensity;
mod normalize;
mod options;
mod organize;
mod postprocess;

pub use intensity::{line_intensity, prune_lines_in_system_with_lowest_intensity, system_intensity};
pub use normalize::normalize_lines_in_system;
pub use options::{PostprocessOptions, SystemOptions};
pub use organize::{organize_lines_in_systems, OrganizeOutcome};
pub use postprocess::postprocess_staff_systems;
