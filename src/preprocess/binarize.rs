use crate::image::{BinaryImage, ImageF32};
use imageproc::contrast::otsu_level;

/// Turns a normalized page into an ink mask.
pub trait Binarizer: Send + Sync {
    fn binarize(&self, img: &ImageF32) -> BinaryImage;
}

/// Global Otsu threshold on the 8-bit quantized page.
///
/// Pixels at or below the level are ink. Uniform pages have no ink.
#[derive(Clone, Copy, Debug, Default)]
pub struct OtsuBinarizer;

impl Binarizer for OtsuBinarizer {
    fn binarize(&self, img: &ImageF32) -> BinaryImage {
        let gray = img.to_gray_image();
        let raw = gray.as_raw();
        let uniform = raw.first().map_or(true, |&v| raw.iter().all(|&p| p == v));
        if uniform {
            return BinaryImage::new(img.w, img.h);
        }
        let level = otsu_level(&gray);
        BinaryImage::from_fn(img.w, img.h, |x, y| gray.get_pixel(x as u32, y as u32)[0] <= level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_pixels_become_ink() {
        let mut img = ImageF32::new(8, 4);
        img.data.fill(0.9);
        for x in 0..8 {
            img.set(x, 1, 0.1);
        }
        img.set(3, 3, 0.2);
        let mask = OtsuBinarizer.binarize(&img);
        assert_eq!(mask.count_foreground(), 9);
        assert!(mask.get(0, 1) && mask.get(3, 3));
        assert!(!mask.get(0, 0));
    }

    #[test]
    fn uniform_page_has_no_ink() {
        let mut img = ImageF32::new(5, 5);
        img.data.fill(1.0);
        assert_eq!(OtsuBinarizer.binarize(&img).count_foreground(), 0);
    }
}
