use super::options::SystemOptions;
use crate::image::BinaryImage;
use crate::types::{Line, StaffSystem};
use log::debug;

/// Fraction of a line's samples backed by ink in `img`.
///
/// A sample counts when any pixel in its column within
/// `±ceil(staff_line_height / 2)` rows (at least one) is foreground.
pub fn line_intensity(line: &Line, img: &BinaryImage, staff_line_height: f32) -> f32 {
    if line.is_empty() {
        return 0.0;
    }
    let radius = ((staff_line_height / 2.0).ceil() as isize).max(1);
    let hits = line
        .points
        .iter()
        .filter(|p| {
            let col = p.col.round() as isize;
            let row = p.row.round() as isize;
            ((row - radius)..=(row + radius)).any(|y| img.get_signed(col, y))
        })
        .count();
    hits as f32 / line.len() as f32
}

/// Mean line intensity of a system.
pub fn system_intensity(system: &StaffSystem, img: &BinaryImage, staff_line_height: f32) -> f32 {
    if system.is_empty() {
        return 0.0;
    }
    system
        .lines
        .iter()
        .map(|l| line_intensity(l, img, staff_line_height))
        .sum::<f32>()
        / system.len() as f32
}

/// Drop systems whose intensity falls below `min_relative_intensity` times
/// the median intensity of all systems on the page.
pub fn prune_lines_in_system_with_lowest_intensity(
    systems: Vec<StaffSystem>,
    img: &BinaryImage,
    staff_line_height: f32,
    opts: &SystemOptions,
) -> Vec<StaffSystem> {
    if systems.is_empty() {
        return systems;
    }
    let scores: Vec<f32> = systems
        .iter()
        .map(|s| system_intensity(s, img, staff_line_height))
        .collect();
    let threshold = opts.min_relative_intensity * median(&scores);
    systems
        .into_iter()
        .zip(scores)
        .filter_map(|(system, score)| {
            if score < threshold {
                debug!(
                    "intensity prune: dropping system at row {:.1} (intensity {:.3} < {:.3})",
                    system.mean_row(),
                    score,
                    threshold
                );
                None
            } else {
                Some(system)
            }
        })
        .collect()
}

fn median(values: &[f32]) -> f32 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    let m = sorted.len();
    if m == 0 {
        0.0
    } else if m % 2 == 1 {
        sorted[m / 2]
    } else {
        0.5 * (sorted[m / 2 - 1] + sorted[m / 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn hline(row: f32, c0: usize, c1: usize) -> Line {
        Line::new((c0..=c1).map(|c| Point::new(row, c as f32)).collect())
    }

    #[test]
    fn intensity_counts_samples_on_ink() {
        let img = BinaryImage::from_fn(100, 40, |x, y| y == 10 && x < 50);
        let line = hline(10.4, 0, 99);
        assert!((line_intensity(&line, &img, 1.0) - 0.5).abs() < 1e-6);
        assert_eq!(line_intensity(&hline(30.0, 0, 99), &img, 1.0), 0.0);
    }

    #[test]
    fn weak_systems_are_dropped() {
        let img = BinaryImage::from_fn(200, 200, |_, y| [20, 40, 60, 100, 120, 140].contains(&y));
        let strong_a = StaffSystem::new(vec![hline(20.0, 0, 199), hline(40.0, 0, 199), hline(60.0, 0, 199)]);
        let strong_b = StaffSystem::new(vec![hline(100.0, 0, 199), hline(120.0, 0, 199), hline(140.0, 0, 199)]);
        let ghost = StaffSystem::new(vec![hline(170.0, 0, 199), hline(180.0, 0, 199), hline(190.0, 0, 199)]);
        let out = prune_lines_in_system_with_lowest_intensity(
            vec![strong_a.clone(), ghost, strong_b.clone()],
            &img,
            2.0,
            &SystemOptions::default(),
        );
        assert_eq!(out, vec![strong_a, strong_b]);
    }
}
