use crate::image::BinaryImage;
use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::HashMap;

/// Horizontal foreground run on one row, `end` inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    pub row: usize,
    pub start: usize,
    pub end: usize,
}

impl Run {
    pub fn width(&self) -> usize {
        self.end + 1 - self.start
    }
}

/// Raw component: the runs of one 8-connected foreground region, in scan order.
#[derive(Clone, Debug, Default)]
pub struct ConnectedComponent {
    pub runs: Vec<Run>,
}

impl ConnectedComponent {
    pub fn pixel_count(&self) -> usize {
        self.runs.iter().map(Run::width).sum()
    }

    pub fn min_col(&self) -> usize {
        self.runs.iter().map(|r| r.start).min().unwrap_or(0)
    }

    pub fn max_col(&self) -> usize {
        self.runs.iter().map(|r| r.end).max().unwrap_or(0)
    }
}

/// Copy of `img` with same-row background gaps of at most `merge_gap`
/// pixels between two ink pixels filled in.
pub fn close_row_gaps(img: &BinaryImage, merge_gap: usize) -> BinaryImage {
    let mut out = img.clone();
    if merge_gap == 0 {
        return out;
    }
    for y in 0..img.h {
        let mut last_ink: Option<usize> = None;
        for x in 0..img.w {
            if !img.get(x, y) {
                continue;
            }
            if let Some(prev) = last_ink {
                if x - prev - 1 <= merge_gap {
                    for gx in prev + 1..x {
                        out.set(gx, y, true);
                    }
                }
            }
            last_ink = Some(x);
        }
    }
    out
}

fn to_gray(img: &BinaryImage) -> GrayImage {
    GrayImage::from_fn(img.w as u32, img.h as u32, |x, y| {
        Luma([if img.get(x as usize, y as usize) { 255 } else { 0 }])
    })
}

/// Label the foreground of `img` into 8-connected components after closing
/// same-row gaps of at most `merge_gap` pixels.
///
/// Components are returned ordered by their first run (top-most, then
/// left-most pixel).
pub fn extract_connected_components(img: &BinaryImage, merge_gap: usize) -> Vec<ConnectedComponent> {
    let closed = close_row_gaps(img, merge_gap);
    let labels = connected_components(&to_gray(&closed), Connectivity::Eight, Luma([0u8]));

    let mut slot_of_label: HashMap<u32, usize> = HashMap::new();
    let mut components: Vec<ConnectedComponent> = Vec::new();
    for y in 0..closed.h {
        let label_at = |x: usize| labels.get_pixel(x as u32, y as u32)[0];
        let mut x = 0;
        while x < closed.w {
            let label = label_at(x);
            if label == 0 {
                x += 1;
                continue;
            }
            let start = x;
            while x < closed.w && label_at(x) == label {
                x += 1;
            }
            let slot = *slot_of_label.entry(label).or_insert_with(|| {
                components.push(ConnectedComponent::default());
                components.len() - 1
            });
            components[slot].runs.push(Run { row: y, start, end: x - 1 });
        }
    }
    components
}
