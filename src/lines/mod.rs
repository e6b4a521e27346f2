//! Staff-line candidates built from normalized components.
//!
//! - `builder` links components left-to-right into polylines over a schedule
//!   of passes with growing gap tolerance.
//! - `prune` removes fragments and near-duplicate detections.
//! - `options` holds the tunables of both stages.

mod builder;
mod options;
mod prune;

pub use builder::connect_connected_components_to_line;
pub use options::{LinePruneOptions, LinkPass, LinkingOptions};
pub use prune::{filter_short_lines, prune_small_lines};

use crate::types::Line;

const OFFSET_SAMPLES: usize = 32;

/// Mean of `b.row - a.row` over the columns both lines cover.
///
/// Sampled at up to 32 evenly spaced columns; `None` when the lines do not
/// overlap.
pub fn mean_vertical_offset(a: &Line, b: &Line) -> Option<f32> {
    let (lo, hi) = a.overlap(b)?;
    let steps = ((hi - lo) as usize).clamp(1, OFFSET_SAMPLES);
    let mut sum = 0.0f32;
    let mut n = 0usize;
    for i in 0..=steps {
        let col = lo + (hi - lo) * i as f32 / steps as f32;
        if let (Some(ra), Some(rb)) = (a.row_at(col), b.row_at(col)) {
            sum += rb - ra;
            n += 1;
        }
    }
    (n > 0).then(|| sum / n as f32)
}
