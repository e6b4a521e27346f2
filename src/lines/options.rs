use serde::{Deserialize, Serialize};

/// One linking pass: tolerances relative to the page's staff geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkPass {
    /// Maximum column gap in multiples of the staff-space height.
    pub gap_factor: f32,
    /// Maximum row jump in multiples of the staff-line height.
    pub vertical_factor: f32,
}

impl LinkPass {
    pub const fn new(gap_factor: f32, vertical_factor: f32) -> Self {
        Self {
            gap_factor,
            vertical_factor,
        }
    }
}

/// Options of the component → line linking stage.
///
/// The default schedule bridges gaps of half a space, then one and a half
/// spaces with a tight vertical window, prunes short fragments, and repeats
/// with a doubled vertical window and gaps up to five spaces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkingOptions {
    pub passes: Vec<LinkPass>,
    /// Lower bound of the vertical tolerance (pixels).
    pub min_vertical_px: f32,
    /// Lower bound of the gap tolerance (pixels).
    pub min_gap_px: f32,
    /// Index of the pass after which fragments are pruned.
    pub prune_after_pass: usize,
    /// Fragments with a smaller span are dropped at that point (pixels).
    pub fragment_min_span: f32,
}

impl Default for LinkingOptions {
    fn default() -> Self {
        Self {
            passes: vec![
                LinkPass::new(0.5, 1.0),
                LinkPass::new(1.5, 1.0),
                LinkPass::new(0.5, 2.0),
                LinkPass::new(1.5, 2.0),
                LinkPass::new(2.5, 2.0),
                LinkPass::new(5.0, 2.0),
            ],
            min_vertical_px: 2.0,
            min_gap_px: 3.0,
            prune_after_pass: 1,
            fragment_min_span: 10.0,
        }
    }
}

/// Options of the line pruning stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinePruneOptions {
    /// Lines must span strictly more than this many pixels.
    pub min_line_span: f32,
    /// Minimum span in multiples of the staff-space height.
    pub min_span_factor: f32,
    /// Lines closer than this many staff spaces are duplicates.
    pub duplicate_factor: f32,
}

impl Default for LinePruneOptions {
    fn default() -> Self {
        Self {
            min_line_span: 50.0,
            min_span_factor: 2.0,
            duplicate_factor: 1.0 / 3.0,
        }
    }
}
