use crate::image::{BinaryImage, ImageF32};
use crate::runs::VerticalRunStats;

/// Everything the line pipeline needs to know about one page.
#[derive(Clone, Debug)]
pub struct ImageData {
    /// Normalized page, 0 = ink, 1 = paper.
    pub image: ImageF32,
    pub staff_line_height: usize,
    pub staff_space_height: usize,
    /// Ink kept by the horizontal run filter.
    pub horizontal_runs_img: BinaryImage,
}

impl ImageData {
    pub fn new(image: ImageF32, stats: VerticalRunStats, horizontal_runs_img: BinaryImage) -> Self {
        Self {
            image,
            staff_line_height: stats.staff_line_height,
            staff_space_height: stats.staff_space_height,
            horizontal_runs_img,
        }
    }
}
