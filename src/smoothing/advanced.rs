use crate::types::{Line, Point, StaffSystem};

const ROBUST_ITERATIONS: usize = 3;
const EPS: f32 = 1e-6;
/// Residuals below half a pixel never count as outliers.
const MIN_SCALE: f32 = 0.5;

/// Robust locally weighted linear regression over every line.
///
/// `window` is the number of neighbouring samples in each local fit.
/// Values below 3 leave the lines untouched.
pub fn smooth_lines_advanced(systems: Vec<StaffSystem>, window: usize) -> Vec<StaffSystem> {
    systems
        .into_iter()
        .map(|s| {
            StaffSystem::new(
                s.lines
                    .iter()
                    .map(|l| smooth_line_advanced(l, window))
                    .collect(),
            )
        })
        .collect()
}

/// LOWESS-style smoothing of one line.
///
/// Tricube distance weights over `window` samples, then bisquare robustness
/// weights from the residuals (scale = 6 × median absolute residual, at
/// least half a pixel).
/// Straight lines are reproduced exactly.
pub fn smooth_line_advanced(line: &Line, window: usize) -> Line {
    let n = line.len();
    if window < 3 || n < 3 {
        return line.clone();
    }
    let k = window.min(n);
    let cols: Vec<f32> = line.points.iter().map(|p| p.col).collect();
    let rows: Vec<f32> = line.points.iter().map(|p| p.row).collect();

    let mut robustness = vec![1.0f32; n];
    let mut fitted = rows.clone();
    for iteration in 0..ROBUST_ITERATIONS {
        for i in 0..n {
            let lo = i.saturating_sub(k / 2).min(n - k);
            let hi = lo + k;
            fitted[i] = local_fit(&cols[lo..hi], &rows[lo..hi], &robustness[lo..hi], cols[i]);
        }
        if iteration + 1 == ROBUST_ITERATIONS {
            break;
        }
        let residuals: Vec<f32> = rows.iter().zip(&fitted).map(|(r, f)| r - f).collect();
        if residuals.iter().all(|r| r.abs() <= EPS) {
            break;
        }
        let scale = (6.0 * median_abs(&residuals)).max(MIN_SCALE);
        for (w, r) in robustness.iter_mut().zip(&residuals) {
            let u = r / scale;
            *w = if u.abs() < 1.0 { (1.0 - u * u).powi(2) } else { 0.0 };
        }
    }

    Line::new(
        line.points
            .iter()
            .zip(fitted)
            .map(|(p, row)| Point::new(row, p.col))
            .collect(),
    )
}

fn local_fit(cols: &[f32], rows: &[f32], robustness: &[f32], at: f32) -> f32 {
    let h = cols
        .iter()
        .map(|c| (c - at).abs())
        .fold(0.0f32, f32::max)
        .max(EPS)
        * 1.0001;
    let mut sw = 0.0f64;
    let mut sx = 0.0f64;
    let mut sy = 0.0f64;
    let mut sxx = 0.0f64;
    let mut sxy = 0.0f64;
    for ((&c, &r), &rw) in cols.iter().zip(rows).zip(robustness) {
        let d = ((c - at).abs() / h).min(1.0);
        let w = ((1.0 - d * d * d).powi(3) * rw) as f64;
        let x = (c - at) as f64;
        sw += w;
        sx += w * x;
        sy += w * r as f64;
        sxx += w * x * x;
        sxy += w * x * r as f64;
    }
    if sw <= f64::from(EPS) {
        let mean = rows.iter().sum::<f32>() / rows.len() as f32;
        return mean;
    }
    let mx = sx / sw;
    let my = sy / sw;
    let var = sxx / sw - mx * mx;
    if var.abs() <= 1e-9 {
        return my as f32;
    }
    let slope = (sxy / sw - mx * my) / var;
    // Evaluated at x = 0, i.e. at `at`.
    (my - slope * mx) as f32
}

fn median_abs(values: &[f32]) -> f32 {
    let mut abs: Vec<f32> = values.iter().map(|v| v.abs()).collect();
    abs.sort_by(f32::total_cmp);
    let m = abs.len();
    if m == 0 {
        0.0
    } else if m % 2 == 1 {
        abs[m / 2]
    } else {
        0.5 * (abs[m / 2 - 1] + abs[m / 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_lines_are_preserved() {
        let line = Line::new(
            (0..120)
                .map(|c| Point::new(30.0 - 0.1 * c as f32, c as f32))
                .collect(),
        );
        let out = smooth_line_advanced(&line, 25);
        for (a, b) in line.points.iter().zip(&out.points) {
            assert_eq!(a.col, b.col);
            assert!((a.row - b.row).abs() < 1e-3);
        }
    }

    #[test]
    fn isolated_outliers_are_ignored() {
        let mut line = Line::new((0..150).map(|c| Point::new(50.0, c as f32)).collect());
        for c in [30usize, 31, 80, 120] {
            line.points[c].row = 56.0;
        }
        let out = smooth_line_advanced(&line, 25);
        for p in &out.points {
            assert!((p.row - 50.0).abs() < 0.2, "row {} at col {}", p.row, p.col);
        }
    }

    #[test]
    fn second_pass_is_nearly_idempotent() {
        let line = Line::new(
            (0..200)
                .map(|c| {
                    let c = c as f32;
                    let bump = if c as usize % 3 == 0 { 0.4 } else { 0.0 };
                    Point::new(60.0 + 3.0 * (c / 40.0).sin() + bump, c)
                })
                .collect(),
        );
        let once = smooth_line_advanced(&line, 25);
        let twice = smooth_line_advanced(&once, 25);
        let max_diff = once
            .points
            .iter()
            .zip(&twice.points)
            .map(|(a, b)| (a.row - b.row).abs())
            .fold(0.0f32, f32::max);
        assert!(max_diff < 0.1, "max change {max_diff}");
    }
}
