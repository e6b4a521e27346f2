use crate::geometry::segment_distance;
use crate::types::{Line, StaffSystem};

/// Replace every line by its Ramer–Douglas–Peucker simplification.
pub fn line_fitting(systems: Vec<StaffSystem>, distance: f32) -> Vec<StaffSystem> {
    systems
        .into_iter()
        .map(|s| StaffSystem::new(s.lines.iter().map(|l| fit_line(l, distance)).collect()))
        .collect()
}

/// Keep the subset of points such that no dropped point lies further than
/// `distance` from the resulting polyline. End points are always kept.
///
/// Non-positive distances and lines with fewer than three points are
/// returned unchanged.
pub fn fit_line(line: &Line, distance: f32) -> Line {
    let n = line.len();
    if n < 3 || distance <= 0.0 {
        return line.clone();
    }
    let pts = &line.points;
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((a, b)) = stack.pop() {
        if b <= a + 1 {
            continue;
        }
        let mut worst = (0.0f32, a);
        for i in (a + 1)..b {
            let d = segment_distance(&pts[i], &pts[a], &pts[b]);
            if d > worst.0 {
                worst = (d, i);
            }
        }
        if worst.0 > distance {
            keep[worst.1] = true;
            stack.push((a, worst.1));
            stack.push((worst.1, b));
        }
    }

    Line::new(
        pts.iter()
            .zip(keep)
            .filter_map(|(p, k)| k.then_some(*p))
            .collect(),
    )
}
