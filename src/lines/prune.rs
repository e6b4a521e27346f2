use super::mean_vertical_offset;
use super::options::LinePruneOptions;
use crate::types::Line;

/// Keep lines whose span is strictly greater than `min_span` pixels.
pub fn filter_short_lines(lines: Vec<Line>, min_span: f32) -> Vec<Line> {
    lines.into_iter().filter(|l| l.span() > min_span).collect()
}

/// Drop lines that are short relative to the staff spacing and suppress
/// near-duplicate detections of the same staff line.
///
/// Lines are visited longest first; a line is a duplicate when it shares
/// columns with an already accepted line and their mean offset over the
/// shared columns is below `duplicate_factor × staff_space_height`.
/// The result is ordered by mean row.
pub fn prune_small_lines(
    lines: Vec<Line>,
    staff_space_height: f32,
    opts: &LinePruneOptions,
) -> Vec<Line> {
    let min_span = opts.min_span_factor * staff_space_height;
    let dup_dist = opts.duplicate_factor * staff_space_height;

    let mut candidates: Vec<Line> = lines.into_iter().filter(|l| l.span() >= min_span).collect();
    candidates.sort_by(|a, b| b.span().total_cmp(&a.span()));

    let mut kept: Vec<Line> = Vec::with_capacity(candidates.len());
    for line in candidates {
        let duplicate = kept.iter().any(|k| {
            mean_vertical_offset(k, &line).is_some_and(|off| off.abs() < dup_dist)
        });
        if !duplicate {
            kept.push(line);
        }
    }
    kept.sort_by(|a, b| a.mean_row().total_cmp(&b.mean_row()));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn hline(row: f32, c0: usize, c1: usize) -> Line {
        Line::new((c0..=c1).map(|c| Point::new(row, c as f32)).collect())
    }

    #[test]
    fn length_floor_is_strict() {
        let lines = vec![hline(0.0, 0, 50), hline(5.0, 0, 51), hline(9.0, 0, 30)];
        let out = filter_short_lines(lines, 50.0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].span(), 51.0);
    }

    #[test]
    fn short_lines_relative_to_spacing_are_dropped() {
        let lines = vec![hline(0.0, 0, 200), hline(40.0, 0, 30)];
        let out = prune_small_lines(lines, 20.0, &LinePruneOptions::default());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].points[0].row, 0.0);
    }

    #[test]
    fn near_duplicates_keep_the_longer_line() {
        let lines = vec![
            hline(10.0, 0, 120),
            hline(12.0, 20, 300),
            hline(30.0, 0, 300),
        ];
        let out = prune_small_lines(lines, 18.0, &LinePruneOptions::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].points[0].row, 12.0);
        assert_eq!(out[1].points[0].row, 30.0);
    }
}
