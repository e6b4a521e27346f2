//! Run-length analysis of binary pages.
//!
//! - `vertical_runs` estimates the staff-line thickness and the staff-space
//!   height as the modes of the vertical foreground/background run lengths.
//! - `horizontal_runs` keeps only horizontal foreground runs of at least
//!   `min_length` pixels, isolating long horizontal structure.
//! - `suppress_vertical_structures` drops pixels that lie on tall vertical
//!   runs (stems, barlines, thick glyphs). This is `ink ^ opening(ink, k×1)`
//!   expressed directly on runs.
//!
//! Every function is total: blank input produces zero estimates and an
//! all-background image.
use crate::image::BinaryImage;
use serde::Serialize;

/// Global vertical run statistics of a page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerticalRunStats {
    /// Mode of background runs bounded by ink above and below.
    pub staff_space_height: usize,
    /// Mode of foreground runs.
    pub staff_line_height: usize,
}

/// Output of the full run-length analysis.
#[derive(Clone, Debug)]
pub struct RunLengthAnalysis {
    pub stats: VerticalRunStats,
    pub filtered: BinaryImage,
}

/// Estimate staff-line and staff-space height from vertical runs.
pub fn vertical_runs(binary: &BinaryImage) -> VerticalRunStats {
    let mut fg_hist = vec![0usize; binary.h + 1];
    let mut bg_hist = vec![0usize; binary.h + 1];
    for x in 0..binary.w {
        let mut y = 0;
        let mut seen_ink = false;
        while y < binary.h {
            let ink = binary.get(x, y);
            let start = y;
            while y < binary.h && binary.get(x, y) == ink {
                y += 1;
            }
            let len = y - start;
            if ink {
                fg_hist[len] += 1;
                seen_ink = true;
            } else if seen_ink && y < binary.h {
                // Background runs touching the top or bottom border are not
                // spaces between lines.
                bg_hist[len] += 1;
            }
        }
    }
    VerticalRunStats {
        staff_space_height: histogram_mode(&bg_hist),
        staff_line_height: histogram_mode(&fg_hist),
    }
}

/// Zero every horizontal foreground run shorter than `min_length`.
pub fn horizontal_runs(binary: &BinaryImage, min_length: usize) -> BinaryImage {
    let mut out = BinaryImage::new(binary.w, binary.h);
    for y in 0..binary.h {
        let mut x = 0;
        while x < binary.w {
            if !binary.get(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < binary.w && binary.get(x, y) {
                x += 1;
            }
            if x - start >= min_length {
                for xi in start..x {
                    out.set(xi, y, true);
                }
            }
        }
    }
    out
}

/// Remove foreground pixels whose vertical run is at least `height` long.
pub fn suppress_vertical_structures(binary: &BinaryImage, height: usize) -> BinaryImage {
    let mut out = BinaryImage::new(binary.w, binary.h);
    for x in 0..binary.w {
        let mut y = 0;
        while y < binary.h {
            if !binary.get(x, y) {
                y += 1;
                continue;
            }
            let start = y;
            while y < binary.h && binary.get(x, y) {
                y += 1;
            }
            if y - start < height {
                for yi in start..y {
                    out.set(x, yi, true);
                }
            }
        }
    }
    out
}

/// Vertical statistics of `binary` plus the horizontal run filter of `staffs`.
pub fn analyze_runs(binary: &BinaryImage, staffs: &BinaryImage, min_length: usize) -> RunLengthAnalysis {
    RunLengthAnalysis {
        stats: vertical_runs(binary),
        filtered: horizontal_runs(staffs, min_length),
    }
}

/// Index of the largest bin, ignoring bin 0; ties resolve to the shorter run.
fn histogram_mode(hist: &[usize]) -> usize {
    let mut best = 0usize;
    let mut best_count = 0usize;
    for (len, &count) in hist.iter().enumerate().skip(1) {
        if count > best_count {
            best = len;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(w: usize, h: usize, rows: &[usize], thickness: usize) -> BinaryImage {
        BinaryImage::from_fn(w, h, |_, y| {
            rows.iter().any(|&r| y >= r && y < r + thickness)
        })
    }

    #[test]
    fn vertical_runs_measure_thickness_and_spacing() {
        let img = striped(40, 100, &[10, 30, 50, 70], 2);
        let stats = vertical_runs(&img);
        assert_eq!(stats.staff_line_height, 2);
        assert_eq!(stats.staff_space_height, 18);
    }

    #[test]
    fn vertical_runs_on_blank_page_are_zero() {
        let img = BinaryImage::new(30, 30);
        assert_eq!(vertical_runs(&img), VerticalRunStats::default());
    }

    #[test]
    fn horizontal_runs_drop_short_segments() {
        let mut img = BinaryImage::new(20, 2);
        for x in 0..10 {
            img.set(x, 0, true);
        }
        for x in 12..15 {
            img.set(x, 0, true);
        }
        img.set(5, 1, true);
        let out = horizontal_runs(&img, 6);
        assert_eq!(out.count_foreground(), 10);
        assert!(out.get(0, 0) && out.get(9, 0));
        assert!(!out.get(12, 0));
        assert!(!out.get(5, 1));
    }

    #[test]
    fn tall_vertical_runs_are_suppressed() {
        // A horizontal line crossed by a stem.
        let img = BinaryImage::from_fn(20, 20, |x, y| y == 10 || x == 5);
        let out = suppress_vertical_structures(&img, 5);
        assert!(!out.get(5, 3), "stem pixel should be removed");
        assert!(!out.get(5, 10), "crossing pixel belongs to the stem run");
        assert!(out.get(6, 10));
        assert_eq!(out.count_foreground(), 19);
    }
}
