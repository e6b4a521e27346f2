use super::options::SystemOptions;
use crate::lines::mean_vertical_offset;
use crate::types::{Line, StaffSystem};
use log::debug;

/// Result of grouping lines into systems.
#[derive(Clone, Debug, Default)]
pub struct OrganizeOutcome {
    pub systems: Vec<StaffSystem>,
    /// Seeds that could not start a complete system and were discarded.
    pub dropped_seeds: usize,
}

/// Group lines into staff systems of exactly `num_line` lines.
///
/// Starting from the topmost free line, the next member is the free line
/// below the current last member, sharing columns with it, whose mean offset
/// is closest to `staff_space_height + staff_line_height`; it must lie within
/// `spacing_tolerance × staff_space_height` of that distance. A group that
/// cannot reach `num_line` members releases its lines and only its seed is
/// dropped. With `num_line <= 1` every line becomes its own system.
pub fn organize_lines_in_systems(
    lines: &[Line],
    staff_space_height: f32,
    staff_line_height: f32,
    num_line: usize,
    opts: &SystemOptions,
) -> OrganizeOutcome {
    if num_line <= 1 {
        return OrganizeOutcome {
            systems: lines.iter().cloned().map(|l| StaffSystem::new(vec![l])).collect(),
            dropped_seeds: 0,
        };
    }

    let expected = staff_space_height + staff_line_height;
    let tolerance = (opts.spacing_tolerance * staff_space_height).max(1.0);
    let reach = expected + tolerance;

    let mut order: Vec<usize> = (0..lines.len()).collect();
    let mean_rows: Vec<f32> = lines.iter().map(Line::mean_row).collect();
    order.sort_by(|&a, &b| mean_rows[a].total_cmp(&mean_rows[b]));

    let mut assigned = vec![false; lines.len()];
    let mut dropped = vec![false; lines.len()];
    let mut outcome = OrganizeOutcome::default();

    while let Some(seed_pos) = order.iter().position(|&i| !assigned[i] && !dropped[i]) {
        let mut group = vec![order[seed_pos]];
        while group.len() < num_line {
            let last = *group.last().unwrap_or(&order[seed_pos]);
            let mut best: Option<(f32, usize)> = None;
            for &j in &order {
                if assigned[j] || dropped[j] || group.contains(&j) {
                    continue;
                }
                let coarse = mean_rows[j] - mean_rows[last];
                if coarse <= 0.0 {
                    continue;
                }
                // Lines are sorted by mean row; anything further down than
                // twice the reach cannot be the next member.
                if coarse > 2.0 * reach {
                    break;
                }
                let Some(offset) = mean_vertical_offset(&lines[last], &lines[j]) else {
                    continue;
                };
                if offset <= 0.0 {
                    continue;
                }
                let deviation = (offset - expected).abs();
                if deviation <= tolerance && best.map_or(true, |(d, _)| deviation < d) {
                    best = Some((deviation, j));
                }
            }
            match best {
                Some((_, j)) => group.push(j),
                None => break,
            }
        }

        if group.len() == num_line {
            for &i in &group {
                assigned[i] = true;
            }
            let members = group.iter().map(|&i| lines[i].clone()).collect();
            outcome.systems.push(StaffSystem::new(members));
        } else {
            let seed = order[seed_pos];
            debug!(
                "organize: dropping seed line at row {:.1} (group of {} < {})",
                mean_rows[seed],
                group.len(),
                num_line
            );
            dropped[seed] = true;
            outcome.dropped_seeds += 1;
        }
    }

    outcome.systems.sort_by(|a, b| {
        let ra = a.lines.first().map_or(0.0, Line::mean_row);
        let rb = b.lines.first().map_or(0.0, Line::mean_row);
        ra.total_cmp(&rb)
    });
    outcome
}
