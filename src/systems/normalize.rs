use super::options::SystemOptions;
use crate::geometry::{fit_row_model, ink_centroid};
use crate::image::BinaryImage;
use crate::types::{Line, Point, StaffSystem};

/// Extend the lines of every system to the system's common column range.
///
/// Each end is extrapolated with a least-squares fit over the line's
/// outermost `extrapolation_factor × staff_space_height` columns. Every new
/// sample snaps to the ink centroid within `±staff_line_height` rows of the
/// prediction when there is ink; tracking continues from the snapped row.
pub fn normalize_lines_in_system(
    systems: Vec<StaffSystem>,
    staff_space_height: f32,
    staff_line_height: f32,
    img: &BinaryImage,
    opts: &SystemOptions,
) -> Vec<StaffSystem> {
    let window = (opts.extrapolation_factor * staff_space_height).max(2.0);
    let radius = (staff_line_height.round() as isize).max(1);
    systems
        .into_iter()
        .map(|system| {
            let lines: Vec<&Line> = system.lines.iter().filter(|l| !l.is_empty()).collect();
            if lines.is_empty() {
                return system;
            }
            let left = lines.iter().map(|l| l.first_col()).fold(f32::INFINITY, f32::min);
            let right = lines.iter().map(|l| l.last_col()).fold(f32::NEG_INFINITY, f32::max);
            let extended = system
                .lines
                .iter()
                .map(|line| extend_line(line, left, right, window, radius, img))
                .collect();
            StaffSystem::new(extended)
        })
        .collect()
}

fn extend_line(
    line: &Line,
    left: f32,
    right: f32,
    window: f32,
    radius: isize,
    img: &BinaryImage,
) -> Line {
    let (Some(first), Some(last)) = (line.first().copied(), line.last().copied()) else {
        return line.clone();
    };

    let head = end_points(&line.points, |p| p.col <= first.col + window, false);
    let tail = end_points(&line.points, |p| p.col >= last.col - window, true);
    let head_slope = fit_row_model(&head).map_or(0.0, |m| m.slope);
    let tail_slope = fit_row_model(&tail).map_or(0.0, |m| m.slope);

    let mut prefix = Vec::new();
    let mut row = first.row;
    let mut col = first.col - 1.0;
    while col >= left {
        row = track(img, col, row - head_slope, radius);
        prefix.push(Point::new(row, col));
        col -= 1.0;
    }
    prefix.reverse();

    let mut points = prefix;
    points.extend_from_slice(&line.points);

    let mut row = last.row;
    let mut col = last.col + 1.0;
    while col <= right {
        row = track(img, col, row + tail_slope, radius);
        points.push(Point::new(row, col));
        col += 1.0;
    }
    Line::new(points)
}

/// Points of one end selected by `keep`; at least two when available.
fn end_points(points: &[Point], keep: impl Fn(&Point) -> bool, from_end: bool) -> Vec<Point> {
    let mut sel: Vec<Point> = points.iter().copied().filter(|p| keep(p)).collect();
    if sel.len() < 2 {
        let n = points.len().min(2);
        sel = if from_end {
            points[points.len() - n..].to_vec()
        } else {
            points[..n].to_vec()
        };
    }
    sel
}

#[inline]
fn track(img: &BinaryImage, col: f32, predicted: f32, radius: isize) -> f32 {
    ink_centroid(img, col.round() as isize, predicted, radius).unwrap_or(predicted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hline(row: f32, c0: usize, c1: usize) -> Line {
        Line::new((c0..=c1).map(|c| Point::new(row, c as f32)).collect())
    }

    #[test]
    fn lines_share_common_column_range() {
        let img = BinaryImage::new(300, 100);
        let system = StaffSystem::new(vec![
            hline(20.0, 10, 200),
            hline(40.0, 30, 250),
            hline(60.0, 0, 220),
        ]);
        let out = normalize_lines_in_system(vec![system], 18.0, 2.0, &img, &SystemOptions::default());
        for line in &out[0].lines {
            assert_eq!(line.first_col(), 0.0);
            assert_eq!(line.last_col(), 250.0);
            assert!(line.has_increasing_columns());
        }
        // No ink: flat lines are extrapolated flat.
        assert!(out[0].lines[1].points.iter().all(|p| p.row == 40.0));
    }

    #[test]
    fn extension_follows_slope_and_snaps_to_ink() {
        // Ink continues the middle line to the left at row 41.
        let img = BinaryImage::from_fn(300, 100, |x, y| x < 30 && y == 41);
        let sloped: Line = Line::new(
            (50..=200)
                .map(|c| Point::new(20.0 + 0.1 * (c - 50) as f32, c as f32))
                .collect(),
        );
        let system = StaffSystem::new(vec![sloped, hline(40.0, 30, 200), hline(60.0, 0, 200)]);
        let out = normalize_lines_in_system(vec![system], 18.0, 2.0, &img, &SystemOptions::default());
        let top = &out[0].lines[0];
        assert_eq!(top.first_col(), 0.0);
        assert!((top.points[0].row - 15.0).abs() < 1e-3, "row {}", top.points[0].row);
        let mid = &out[0].lines[1];
        assert_eq!(mid.points[0].row, 41.0);
    }
}
