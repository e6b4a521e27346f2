use super::options::LinkingOptions;
use crate::components::Component;
use crate::types::Line;
use log::debug;
use std::collections::BTreeSet;

/// Link normalized components into staff-line candidates.
///
/// Each pass walks the pieces (components, then the previous pass's lines)
/// by first column and appends a piece to the open line that ends before it
/// within the pass's gap and vertical tolerances. Among eligible lines the
/// smallest row jump wins, then the smallest gap, then the older line.
///
/// Output lines have strictly increasing columns and are ordered by mean row.
pub fn connect_connected_components_to_line(
    components: Vec<Component>,
    staff_line_height: f32,
    staff_space_height: f32,
    opts: &LinkingOptions,
) -> Vec<Line> {
    let mut lines: Vec<Line> = components.into_iter().map(Component::into_line).collect();
    for (pass_idx, pass) in opts.passes.iter().enumerate() {
        let max_gap = (pass.gap_factor * staff_space_height).max(opts.min_gap_px);
        let max_dv = (pass.vertical_factor * staff_line_height).max(opts.min_vertical_px);
        let before = lines.len();
        lines = link_pass(lines, max_gap, max_dv);
        if pass_idx == opts.prune_after_pass {
            lines.retain(|l| l.span() >= opts.fragment_min_span);
        }
        debug!(
            "link pass {} (gap x{}, dv x{}): gap<={:.1} dv<={:.1} lines {} -> {}",
            pass_idx,
            pass.gap_factor,
            pass.vertical_factor,
            max_gap,
            max_dv,
            before,
            lines.len()
        );
    }
    lines.sort_by(|a, b| {
        a.mean_row()
            .total_cmp(&b.mean_row())
            .then(a.first_col().total_cmp(&b.first_col()))
    });
    lines
}

#[inline]
fn col_key(col: f32) -> i64 {
    col.round() as i64
}

/// Single greedy linking sweep over `pieces`.
///
/// Lines are kept in an arena; `open` indexes them by their last column so
/// that candidates are found with a range query over the allowed gap.
fn link_pass(mut pieces: Vec<Line>, max_gap: f32, max_dv: f32) -> Vec<Line> {
    pieces.retain(|l| !l.is_empty());
    pieces.sort_by(|a, b| {
        a.first_col()
            .total_cmp(&b.first_col())
            .then(a.mean_row().total_cmp(&b.mean_row()))
    });

    let mut arena: Vec<Line> = Vec::with_capacity(pieces.len());
    let mut open: BTreeSet<(i64, usize)> = BTreeSet::new();

    for piece in pieces {
        let (head_row, head_col) = match piece.first() {
            Some(p) => (p.row, p.col),
            None => continue,
        };
        let lo = col_key((head_col - max_gap).floor());
        let hi = col_key(head_col);

        let mut best: Option<(f32, f32, usize)> = None;
        for &(_, idx) in open.range((lo, 0)..=(hi, usize::MAX)) {
            let Some(tail) = arena[idx].last() else {
                continue;
            };
            let gap = head_col - tail.col;
            if gap <= 0.0 || gap > max_gap {
                continue;
            }
            let dv = (head_row - tail.row).abs();
            if dv > max_dv {
                continue;
            }
            if best.map_or(true, |b| (dv, gap, idx) < b) {
                best = Some((dv, gap, idx));
            }
        }

        match best {
            Some((_, _, idx)) => {
                open.remove(&(col_key(arena[idx].last_col()), idx));
                arena[idx].points.extend(piece.points);
                open.insert((col_key(arena[idx].last_col()), idx));
            }
            None => {
                let idx = arena.len();
                open.insert((col_key(piece.last_col()), idx));
                arena.push(piece);
            }
        }
    }
    arena
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn component(row: f32, cols: std::ops::Range<usize>) -> Component {
        let points: Vec<Point> = cols.clone().map(|c| Point::new(row, c as f32)).collect();
        Component {
            min_col: cols.start,
            max_col: cols.end - 1,
            row,
            pixels: points.len(),
            points,
        }
    }

    #[test]
    fn bridges_gaps_within_tolerance() {
        let comps = vec![
            component(10.0, 0..40),
            component(10.5, 45..90),
            component(11.0, 100..160),
        ];
        let lines =
            connect_connected_components_to_line(comps, 2.0, 18.0, &LinkingOptions::default());
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line.has_increasing_columns());
        assert_eq!(line.first_col(), 0.0);
        assert_eq!(line.last_col(), 159.0);
    }

    #[test]
    fn does_not_merge_neighbouring_staff_lines() {
        let comps = vec![
            component(10.0, 0..60),
            component(30.0, 62..120),
            component(30.0, 0..60),
            component(10.0, 62..120),
        ];
        let lines =
            connect_connected_components_to_line(comps, 2.0, 18.0, &LinkingOptions::default());
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert!(line.has_increasing_columns());
            assert!(line.points.iter().all(|p| p.row == line.points[0].row));
            assert_eq!(line.span(), 119.0);
        }
    }

    #[test]
    fn prefers_smallest_vertical_jump() {
        let comps = vec![
            component(10.0, 0..50),
            component(12.0, 0..50),
            component(11.8, 55..100),
        ];
        let lines =
            connect_connected_components_to_line(comps, 2.0, 18.0, &LinkingOptions::default());
        let long = lines.iter().find(|l| l.span() > 60.0).unwrap();
        assert_eq!(long.points[0].row, 12.0);
    }

    #[test]
    fn short_isolated_fragments_are_pruned() {
        let comps = vec![component(10.0, 0..5), component(50.0, 0..80)];
        let lines =
            connect_connected_components_to_line(comps, 2.0, 18.0, &LinkingOptions::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].points[0].row, 50.0);
    }

    #[test]
    fn overlapping_components_start_new_lines() {
        let comps = vec![component(10.0, 0..50), component(10.0, 40..90)];
        let lines =
            connect_connected_components_to_line(comps, 2.0, 18.0, &LinkingOptions::default());
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(Line::has_increasing_columns));
    }
}
