use super::options::PostprocessOptions;
use crate::geometry::ink_centroid;
use crate::image::BinaryImage;
use crate::types::{Line, Point, StaffSystem};

/// Recover line pieces that the run-length filter removed.
///
/// Works on the binarized page (ink = 1):
/// 1. interior gaps are filled column by column with the ink centroid near
///    the linear interpolation of the gap, or the interpolation itself;
/// 2. both ends are traced outward while ink continues near the current row,
///    tolerating `max_gap_factor × staff_space_height` columns without ink.
///    Untracked columns after the last ink hit are discarded.
pub fn postprocess_staff_systems(
    systems: Vec<StaffSystem>,
    staff_line_height: f32,
    staff_space_height: f32,
    binary: &BinaryImage,
    opts: &PostprocessOptions,
) -> Vec<StaffSystem> {
    let radius = (((staff_line_height / 2.0).ceil()) as isize).max(1);
    let max_misses = ((opts.max_gap_factor * staff_space_height).round() as usize).max(1);
    systems
        .into_iter()
        .map(|system| {
            let lines = system
                .lines
                .iter()
                .map(|line| {
                    let filled = fill_gaps(line, binary, radius);
                    trace_ends(filled, binary, radius, max_misses)
                })
                .collect();
            StaffSystem::new(lines)
        })
        .collect()
}

fn fill_gaps(line: &Line, binary: &BinaryImage, radius: isize) -> Line {
    let mut points = Vec::with_capacity(line.len());
    for pair in line.points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        points.push(a);
        let gap = b.col - a.col;
        let mut col = a.col + 1.0;
        while col < b.col {
            let t = (col - a.col) / gap;
            let interp = a.row + t * (b.row - a.row);
            let row = ink_centroid(binary, col.round() as isize, interp, radius).unwrap_or(interp);
            points.push(Point::new(row, col));
            col += 1.0;
        }
    }
    if let Some(last) = line.last() {
        points.push(*last);
    }
    Line::new(points)
}

fn trace_ends(line: Line, binary: &BinaryImage, radius: isize, max_misses: usize) -> Line {
    let (Some(first), Some(last)) = (line.first().copied(), line.last().copied()) else {
        return line;
    };
    let mut prefix = trace(binary, first, -1.0, radius, max_misses);
    prefix.reverse();
    let suffix = trace(binary, last, 1.0, radius, max_misses);

    let mut points = prefix;
    points.extend(line.points);
    points.extend(suffix);
    Line::new(points)
}

/// Follow ink from `start` in direction `step` (±1 column).
fn trace(binary: &BinaryImage, start: Point, step: f32, radius: isize, max_misses: usize) -> Vec<Point> {
    let mut committed = Vec::new();
    let mut pending = Vec::new();
    let mut row = start.row;
    let mut col = start.col + step;
    let mut misses = 0usize;
    while col >= 0.0 && col < binary.w as f32 {
        match ink_centroid(binary, col.round() as isize, row, radius) {
            Some(r) => {
                row = r;
                committed.append(&mut pending);
                committed.push(Point::new(row, col));
                misses = 0;
            }
            None => {
                misses += 1;
                if misses > max_misses {
                    break;
                }
                pending.push(Point::new(row, col));
            }
        }
        col += step;
    }
    committed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hline(row: f32, c0: usize, c1: usize) -> Line {
        Line::new((c0..=c1).map(|c| Point::new(row, c as f32)).collect())
    }

    #[test]
    fn interior_gaps_are_filled() {
        let binary = BinaryImage::from_fn(200, 50, |x, y| y == 20 && (10..=150).contains(&x));
        let mut line = hline(20.0, 10, 60);
        line.points.extend(hline(20.0, 90, 150).points);
        let out = postprocess_staff_systems(
            vec![StaffSystem::new(vec![line])],
            1.0,
            18.0,
            &binary,
            &PostprocessOptions::default(),
        );
        let l = &out[0].lines[0];
        assert_eq!(l.len(), 141);
        assert!(l.has_increasing_columns());
        assert!(l.points.iter().all(|p| p.row == 20.0));
    }

    #[test]
    fn ends_are_traced_through_ink_and_small_gaps() {
        // Ink continues right of the detected piece with a 4 px interruption.
        let binary = BinaryImage::from_fn(300, 50, |x, y| {
            y == 20 && (50..=200).contains(&x) && !(160..164).contains(&x)
        });
        let line = hline(20.0, 60, 150);
        let out = postprocess_staff_systems(
            vec![StaffSystem::new(vec![line])],
            1.0,
            18.0,
            &binary,
            &PostprocessOptions::default(),
        );
        let l = &out[0].lines[0];
        assert_eq!(l.first_col(), 50.0);
        assert_eq!(l.last_col(), 200.0);
        assert!(l.has_increasing_columns());
    }

    #[test]
    fn tracing_stops_at_long_gaps() {
        let binary = BinaryImage::from_fn(300, 50, |x, y| {
            y == 20 && ((60..=150).contains(&x) || (180..=250).contains(&x))
        });
        let out = postprocess_staff_systems(
            vec![StaffSystem::new(vec![hline(20.0, 60, 150)])],
            1.0,
            18.0,
            &binary,
            &PostprocessOptions::default(),
        );
        assert_eq!(out[0].lines[0].last_col(), 150.0);
    }
}
