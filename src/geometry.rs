//! Small numeric helpers shared by the system and smoothing stages.
use crate::image::BinaryImage;
use crate::types::Point;
use nalgebra::{Matrix2, Vector2};

const EPS: f32 = 1e-6;

/// Least-squares model `row = intercept + slope * col`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowModel {
    pub intercept: f32,
    pub slope: f32,
}

impl RowModel {
    #[inline]
    pub fn row_at(&self, col: f32) -> f32 {
        self.intercept + self.slope * col
    }
}

/// Fit `row = a + b·col` through `points` via the normal equations.
///
/// A single point (or points sharing one column) yields a flat model through
/// their mean row; an empty slice yields `None`.
pub fn fit_row_model(points: &[Point]) -> Option<RowModel> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (mut sx, mut sy, mut sxx, mut sxy) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for p in points {
        let (x, y) = (p.col as f64, p.row as f64);
        sx += x;
        sy += y;
        sxx += x * x;
        sxy += x * y;
    }
    let normal = Matrix2::new(n, sx, sx, sxx);
    let rhs = Vector2::new(sy, sxy);
    let flat = RowModel {
        intercept: (sy / n) as f32,
        slope: 0.0,
    };
    if normal.determinant().abs() <= f64::from(EPS) {
        return Some(flat);
    }
    match normal.lu().solve(&rhs) {
        Some(sol) => Some(RowModel {
            intercept: sol[0] as f32,
            slope: sol[1] as f32,
        }),
        None => Some(flat),
    }
}

/// Perpendicular distance of `p` to the segment `a`–`b` in (col, row) space.
pub fn segment_distance(p: &Point, a: &Point, b: &Point) -> f32 {
    let (dx, dy) = (b.col - a.col, b.row - a.row);
    let len_sq = dx * dx + dy * dy;
    if len_sq <= EPS {
        return ((p.col - a.col).powi(2) + (p.row - a.row).powi(2)).sqrt();
    }
    let t = (((p.col - a.col) * dx + (p.row - a.row) * dy) / len_sq).clamp(0.0, 1.0);
    let (qx, qy) = (a.col + t * dx, a.row + t * dy);
    ((p.col - qx).powi(2) + (p.row - qy).powi(2)).sqrt()
}

/// Mean row of foreground pixels in column `col` within `center ± radius`.
pub fn ink_centroid(img: &BinaryImage, col: isize, center: f32, radius: isize) -> Option<f32> {
    let c = center.round() as isize;
    let mut sum = 0isize;
    let mut n = 0isize;
    for y in (c - radius)..=(c + radius) {
        if img.get_signed(col, y) {
            sum += y;
            n += 1;
        }
    }
    (n > 0).then(|| sum as f32 / n as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_recovers_sloped_line() {
        let pts: Vec<Point> = (0..20)
            .map(|c| Point::new(5.0 + 0.25 * c as f32, c as f32))
            .collect();
        let m = fit_row_model(&pts).unwrap();
        assert!((m.slope - 0.25).abs() < 1e-4);
        assert!((m.intercept - 5.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_fit_is_flat() {
        let pts = [Point::new(3.0, 7.0)];
        let m = fit_row_model(&pts).unwrap();
        assert_eq!(m.slope, 0.0);
        assert_eq!(m.row_at(100.0), 3.0);
        assert!(fit_row_model(&[]).is_none());
    }

    #[test]
    fn distance_to_segment_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 10.0);
        assert!((segment_distance(&Point::new(2.0, 5.0), &a, &b) - 2.0).abs() < 1e-6);
        assert!((segment_distance(&Point::new(0.0, 13.0), &a, &b) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn centroid_ignores_pixels_outside_window() {
        let img = BinaryImage::from_fn(5, 30, |_, y| y == 10 || y == 11 || y == 20);
        assert_eq!(ink_centroid(&img, 2, 10.0, 2), Some(10.5));
        assert_eq!(ink_centroid(&img, 2, 15.0, 2), None);
        assert_eq!(ink_centroid(&img, -1, 10.0, 2), None);
    }
}
