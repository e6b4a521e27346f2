//! Parameter types configuring the detector stages.
//!
//! The top-level fields select which optional stages run; the nested option
//! structs hold the tunables of the individual stages. Every field has a
//! default, so a JSON configuration only needs to name what it changes.
//!
//! Tolerances are mostly expressed relative to the page's measured staff
//! geometry (staff-space and staff-line height), which keeps the defaults
//! usable across scan resolutions.

use crate::error::ConfigError;
use crate::lines::{LinePruneOptions, LinkingOptions};
use crate::preprocess::PreprocessOptions;
use crate::smoothing::SmoothingMode;
use crate::systems::{PostprocessOptions, SystemOptions};
use serde::{Deserialize, Serialize};

/// Detector-wide parameters controlling the staff-line pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Horizontal runs shorter than this are removed from the run-length
    /// image (pixels, >= 1).
    pub min_length: usize,
    /// Lines per staff system. `1` disables grouping.
    pub num_line: usize,
    /// Extend the lines of a system to a common column range.
    pub line_extension: bool,
    /// Recover line pieces from the binarized page.
    pub post_process: bool,
    /// Smoothing applied to the final polylines (0 off, 1 low-pass, 2 advanced).
    pub smooth_lines: SmoothingMode,
    /// Cutoff of the low-pass smoother, as the sigma of the equivalent
    /// Gaussian (samples).
    pub smooth_value_lowpass: f32,
    /// Window of the advanced smoother (samples, >= 3).
    pub smooth_value_adv: usize,
    /// Ramer–Douglas–Peucker tolerance in pixels; `0` disables fitting.
    pub line_fit_distance: f32,
    /// Staff-space hint handed to a pixel classifier (pixels).
    pub line_space_height: usize,
    /// Worker threads for batch preparation; `None` uses the global pool.
    pub processes: Option<usize>,
    pub preprocess: PreprocessOptions,
    pub linking: LinkingOptions,
    pub line_prune: LinePruneOptions,
    pub systems: SystemOptions,
    pub postprocess: PostprocessOptions,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            min_length: 6,
            num_line: 5,
            line_extension: true,
            post_process: true,
            smooth_lines: SmoothingMode::Off,
            smooth_value_lowpass: 5.0,
            smooth_value_adv: 25,
            line_fit_distance: 0.5,
            line_space_height: 20,
            processes: None,
            preprocess: PreprocessOptions::default(),
            linking: LinkingOptions::default(),
            line_prune: LinePruneOptions::default(),
            systems: SystemOptions::default(),
            postprocess: PostprocessOptions::default(),
        }
    }
}

impl DetectorParams {
    /// Check every value range; the first violation is reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_length == 0 {
            return Err(ConfigError::invalid("min_length", "must be at least 1"));
        }
        if self.num_line == 0 {
            return Err(ConfigError::invalid("num_line", "must be at least 1"));
        }
        if !(self.smooth_value_lowpass.is_finite() && self.smooth_value_lowpass > 0.0) {
            return Err(ConfigError::invalid(
                "smooth_value_lowpass",
                format!("must be a positive number, got {}", self.smooth_value_lowpass),
            ));
        }
        if self.smooth_value_adv < 3 {
            return Err(ConfigError::invalid(
                "smooth_value_adv",
                format!("window must be at least 3 samples, got {}", self.smooth_value_adv),
            ));
        }
        non_negative("line_fit_distance", self.line_fit_distance)?;
        if self.line_space_height == 0 {
            return Err(ConfigError::invalid("line_space_height", "must be at least 1"));
        }
        if self.processes == Some(0) {
            return Err(ConfigError::invalid("processes", "must be at least 1 when set"));
        }

        let pre = &self.preprocess;
        if pre.vertical_structure_height < 2 {
            return Err(ConfigError::invalid(
                "preprocess.vertical_structure_height",
                "must be at least 2",
            ));
        }
        let (lo, hi) = (pre.low_percentile, pre.high_percentile);
        if !(0.0..=100.0).contains(&lo) || !(0.0..=100.0).contains(&hi) || lo >= hi {
            return Err(ConfigError::invalid(
                "preprocess.low_percentile",
                format!("percentiles must satisfy 0 <= low < high <= 100, got {lo} and {hi}"),
            ));
        }

        let link = &self.linking;
        if link.passes.is_empty() {
            return Err(ConfigError::invalid("linking.passes", "at least one pass is required"));
        }
        for pass in &link.passes {
            positive("linking.passes.gap_factor", pass.gap_factor)?;
            positive("linking.passes.vertical_factor", pass.vertical_factor)?;
        }
        if link.prune_after_pass >= link.passes.len() {
            return Err(ConfigError::invalid(
                "linking.prune_after_pass",
                format!("must index one of the {} passes", link.passes.len()),
            ));
        }
        non_negative("linking.min_vertical_px", link.min_vertical_px)?;
        non_negative("linking.min_gap_px", link.min_gap_px)?;
        non_negative("linking.fragment_min_span", link.fragment_min_span)?;

        let prune = &self.line_prune;
        non_negative("line_prune.min_line_span", prune.min_line_span)?;
        non_negative("line_prune.min_span_factor", prune.min_span_factor)?;
        non_negative("line_prune.duplicate_factor", prune.duplicate_factor)?;

        let sys = &self.systems;
        positive("systems.spacing_tolerance", sys.spacing_tolerance)?;
        if !(0.0..=1.0).contains(&sys.min_relative_intensity) {
            return Err(ConfigError::invalid(
                "systems.min_relative_intensity",
                format!("must lie in [0, 1], got {}", sys.min_relative_intensity),
            ));
        }
        positive("systems.extrapolation_factor", sys.extrapolation_factor)?;

        non_negative("postprocess.max_gap_factor", self.postprocess.max_gap_factor)?;
        Ok(())
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be a positive number, got {v}")))
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be a non-negative number, got {v}")))
    }
}
