//! Geometry produced by the detector: points, staff lines and staff systems.
//!
//! Serialized shapes follow the nested list convention used by OMR tooling:
//! a point is `[row, col]`, a line is a list of points, a system a list of
//! lines and a page a list of systems.
use serde::{Deserialize, Serialize};

/// Sample on a staff line in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub row: f32,
    pub col: f32,
}

impl Point {
    pub const fn new(row: f32, col: f32) -> Self {
        Self { row, col }
    }
}

impl From<[f32; 2]> for Point {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.row, p.col]
    }
}

/// One staff line as a polyline with strictly increasing columns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line {
    pub points: Vec<Point>,
}

impl Line {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Horizontal extent `last.col - first.col`; 0 for empty lines.
    pub fn span(&self) -> f32 {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => b.col - a.col,
            _ => 0.0,
        }
    }

    pub fn first_col(&self) -> f32 {
        self.points.first().map_or(0.0, |p| p.col)
    }

    pub fn last_col(&self) -> f32 {
        self.points.last().map_or(0.0, |p| p.col)
    }

    pub fn mean_row(&self) -> f32 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.row).sum::<f32>() / self.points.len() as f32
    }

    /// Row at `col` by linear interpolation between neighbouring samples.
    /// `None` outside `[first_col, last_col]`.
    pub fn row_at(&self, col: f32) -> Option<f32> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if col < first.col || col > last.col {
            return None;
        }
        let idx = self.points.partition_point(|p| p.col < col);
        let hi = self.points[idx];
        if hi.col == col || idx == 0 {
            return Some(hi.row);
        }
        let lo = self.points[idx - 1];
        let t = (col - lo.col) / (hi.col - lo.col);
        Some(lo.row + t * (hi.row - lo.row))
    }

    /// Shared column interval with `other`, if any.
    pub fn overlap(&self, other: &Line) -> Option<(f32, f32)> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let lo = self.first_col().max(other.first_col());
        let hi = self.last_col().min(other.last_col());
        (lo <= hi).then_some((lo, hi))
    }

    pub fn has_increasing_columns(&self) -> bool {
        self.points.windows(2).all(|w| w[0].col < w[1].col)
    }
}

/// Staff lines of one staff, ordered top to bottom.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffSystem {
    pub lines: Vec<Line>,
}

impl StaffSystem {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn mean_row(&self) -> f32 {
        if self.lines.is_empty() {
            return 0.0;
        }
        self.lines.iter().map(Line::mean_row).sum::<f32>() / self.lines.len() as f32
    }
}
