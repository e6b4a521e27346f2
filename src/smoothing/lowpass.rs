use crate::types::{Line, Point, StaffSystem};
use nalgebra::DVector;
use std::f64::consts::{LN_2, PI};

/// Low-pass every line's rows. `sigma` (in samples) sets the cutoff at the
/// half-amplitude frequency of a Gaussian with that standard deviation;
/// `sigma <= 0` leaves the lines untouched.
pub fn smooth_lines(systems: Vec<StaffSystem>, sigma: f32) -> Vec<StaffSystem> {
    systems
        .into_iter()
        .map(|s| StaffSystem::new(s.lines.iter().map(|l| smooth_line(l, sigma)).collect()))
        .collect()
}

/// Smooth one line by orthogonal projection of its rows onto the cosine
/// modes below the cutoff plus a linear trend.
///
/// A projection maps its own output to itself, so smoothing an already
/// smoothed line changes nothing, and straight lines (any slope) come out
/// unchanged.
pub fn smooth_line(line: &Line, sigma: f32) -> Line {
    let n = line.len();
    if sigma <= 0.0 || n < 3 {
        return line.clone();
    }
    let modes = cutoff_modes(n, sigma);
    if modes + 1 >= n {
        return line.clone();
    }

    let rows = DVector::from_iterator(n, line.points.iter().map(|p| p.row as f64));
    let basis = cosine_basis(n, modes);
    let mut smoothed = DVector::<f64>::zeros(n);
    for phi in &basis {
        smoothed.axpy(phi.dot(&rows), phi, 1.0);
    }
    if let Some(trend) = residual_trend(n, &basis) {
        smoothed.axpy(trend.dot(&rows), &trend, 1.0);
    }

    let points = line
        .points
        .iter()
        .zip(smoothed.iter())
        .map(|(p, &row)| Point::new(row as f32, p.col))
        .collect();
    Line::new(points)
}

/// Number of DCT-II modes whose frequency lies below the cutoff; always
/// includes the constant mode.
fn cutoff_modes(n: usize, sigma: f32) -> usize {
    let omega = (2.0 * LN_2).sqrt() / sigma as f64;
    (n as f64 * omega / PI).floor() as usize + 1
}

/// Orthonormal DCT-II basis vectors `0..modes` of length `n`.
fn cosine_basis(n: usize, modes: usize) -> Vec<DVector<f64>> {
    let nf = n as f64;
    (0..modes)
        .map(|k| {
            let scale = if k == 0 { (1.0 / nf).sqrt() } else { (2.0 / nf).sqrt() };
            DVector::from_fn(n, |i, _| scale * (PI * k as f64 * (i as f64 + 0.5) / nf).cos())
        })
        .collect()
}

/// Unit linear ramp orthogonalized against `basis`, or `None` when the ramp
/// already lies in its span.
fn residual_trend(n: usize, basis: &[DVector<f64>]) -> Option<DVector<f64>> {
    let centre = (n - 1) as f64 / 2.0;
    let mut trend = DVector::from_fn(n, |i, _| i as f64 - centre);
    let initial = trend.norm();
    // Two Gram-Schmidt sweeps keep the residual orthogonal in floating point.
    for _ in 0..2 {
        for phi in basis {
            let c = phi.dot(&trend);
            trend.axpy(-c, phi, 1.0);
        }
    }
    let norm = trend.norm();
    if norm <= 1e-9 * initial {
        return None;
    }
    trend /= norm;
    Some(trend)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_ramp(n: usize) -> Line {
        Line::new(
            (0..n)
                .map(|c| {
                    let noise = if c % 2 == 0 { 0.5 } else { -0.5 };
                    Point::new(40.0 + 0.05 * c as f32 + noise, c as f32)
                })
                .collect(),
        )
    }

    /// Flat line at row 50 with a 3 px glyph bump over ten columns.
    fn bumped_line(n: usize) -> Line {
        Line::new(
            (0..n)
                .map(|c| {
                    let bump = if (145..155).contains(&c) { 3.0 } else { 0.0 };
                    Point::new(50.0 + bump, c as f32)
                })
                .collect(),
        )
    }

    fn max_row_change(a: &Line, b: &Line) -> f32 {
        assert_eq!(a.len(), b.len());
        a.points
            .iter()
            .zip(b.points.iter())
            .map(|(p, q)| {
                assert_eq!(p.col, q.col);
                (p.row - q.row).abs()
            })
            .fold(0.0f32, f32::max)
    }

    #[test]
    fn straight_lines_are_preserved() {
        let line = Line::new((0..100).map(|c| Point::new(10.0 + 0.2 * c as f32, c as f32)).collect());
        let out = smooth_line(&line, 5.0);
        assert!(max_row_change(&line, &out) < 1e-3);
    }

    #[test]
    fn alternating_noise_is_removed() {
        let out = smooth_line(&noisy_ramp(200), 5.0);
        for p in &out.points[20..180] {
            let ideal = 40.0 + 0.05 * p.col;
            assert!((p.row - ideal).abs() < 0.05);
        }
    }

    #[test]
    fn second_pass_reproduces_the_first_on_the_whole_line() {
        let systems = vec![StaffSystem::new(vec![noisy_ramp(300), bumped_line(300)])];
        let once = smooth_lines(systems, 5.0);
        let twice = smooth_lines(once.clone(), 5.0);
        for (a, b) in once[0].lines.iter().zip(twice[0].lines.iter()) {
            let change = max_row_change(a, b);
            assert!(change < 1e-3, "max change {change}");
        }
    }

    #[test]
    fn glyph_bump_is_flattened() {
        let out = smooth_line(&bumped_line(300), 5.0);
        let peak = out.points[145..155].iter().map(|p| p.row).fold(f32::MIN, f32::max);
        assert!(peak > 50.0 && peak < 52.8, "peak {peak}");
        assert!((out.points[20].row - 50.0).abs() < 0.3);
    }
}
