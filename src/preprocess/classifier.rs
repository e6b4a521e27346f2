use crate::image::{BinaryImage, ImageF32};

/// External per-pixel staff-line model.
///
/// Receives normalized pages and the staff-space hint (pixels) the model was
/// trained for; returns one mask per page at the page's resolution with
/// staff-line pixels set.
pub trait PixelClassifier: Sync {
    fn predict(&self, pages: &[ImageF32], line_space_height: usize) -> Vec<BinaryImage>;
}
