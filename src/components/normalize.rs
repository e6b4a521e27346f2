use super::extractor::ConnectedComponent;
use crate::types::{Line, Point};

/// Component reduced to one sample per column.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// Mean row of the component's pixels for every covered column.
    pub points: Vec<Point>,
    pub min_col: usize,
    pub max_col: usize,
    /// Mean row over all pixels.
    pub row: f32,
    pub pixels: usize,
}

impl Component {
    pub fn into_line(self) -> Line {
        Line::new(self.points)
    }
}

/// Drop degenerate components and convert the rest to per-column polylines.
///
/// A component is degenerate when it has fewer than `min_pixels` pixels or
/// covers a single column. Output is ordered by first column, then row.
pub fn normalize_connected_components(
    components: &[ConnectedComponent],
    min_pixels: usize,
) -> Vec<Component> {
    let mut out: Vec<Component> = components
        .iter()
        .filter_map(|cc| normalize_one(cc, min_pixels))
        .collect();
    out.sort_by(|a, b| {
        a.min_col
            .cmp(&b.min_col)
            .then(a.row.partial_cmp(&b.row).unwrap_or(std::cmp::Ordering::Equal))
    });
    out
}

fn normalize_one(cc: &ConnectedComponent, min_pixels: usize) -> Option<Component> {
    let pixels = cc.pixel_count();
    if pixels < min_pixels.max(1) {
        return None;
    }
    let min_col = cc.min_col();
    let max_col = cc.max_col();
    if max_col == min_col {
        return None;
    }
    let width = max_col - min_col + 1;
    let mut sum_rows = vec![0.0f64; width];
    let mut counts = vec![0usize; width];
    let mut total = 0.0f64;
    for run in &cc.runs {
        for col in run.start..=run.end {
            sum_rows[col - min_col] += run.row as f64;
            counts[col - min_col] += 1;
        }
        total += run.row as f64 * run.width() as f64;
    }
    let points = sum_rows
        .iter()
        .zip(counts.iter())
        .enumerate()
        .filter(|(_, (_, &n))| n > 0)
        .map(|(i, (&s, &n))| Point::new((s / n as f64) as f32, (min_col + i) as f32))
        .collect();
    Some(Component {
        points,
        min_col,
        max_col,
        row: (total / pixels as f64) as f32,
        pixels,
    })
}
