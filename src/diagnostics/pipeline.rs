use super::timing::TimingBreakdown;
use crate::types::StaffSystem;
use serde::Serialize;

/// Result of [`StaffLineDetector::detect_staff_lines_with_diagnostics`](crate::StaffLineDetector).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub systems: Vec<StaffSystem>,
    pub trace: PipelineTrace,
}

/// Page size and measured staff geometry.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub staff_line_height: usize,
    pub staff_space_height: usize,
}

/// Number of candidates alive after each stage.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCounts {
    pub components: usize,
    pub candidate_lines: usize,
    pub after_length_filter: usize,
    pub after_pruning: usize,
    pub systems_organized: usize,
    pub systems_after_intensity_pruning: usize,
    /// Organizer seeds dropped because their group stayed incomplete.
    pub dropped_seeds: usize,
}

/// Execution trace of one page.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub counts: StageCounts,
    /// Labels of the optional stages that ran, in order.
    pub plan: Vec<String>,
    pub timings: TimingBreakdown,
}

impl PipelineTrace {
    /// One-line summary used by the CLI.
    pub fn summary(&self) -> String {
        format!(
            "line={}px space={}px components={} lines={}/{}/{} systems={}/{} dropped_seeds={} total={:.2}ms",
            self.input.staff_line_height,
            self.input.staff_space_height,
            self.counts.components,
            self.counts.candidate_lines,
            self.counts.after_length_filter,
            self.counts.after_pruning,
            self.counts.systems_organized,
            self.counts.systems_after_intensity_pruning,
            self.counts.dropped_seeds,
            self.timings.total_ms
        )
    }
}
