use crate::image::{ImageF32, ImageView};

const HISTOGRAM_BINS: usize = 10;

/// Contrast enhancement applied to the normalized page before binarization.
pub trait Enhancer: Send + Sync {
    fn enhance(&self, img: &ImageF32) -> ImageF32;
}

/// Linear stretch mapping the `low`/`high` percentiles to 0 and 1.
#[derive(Clone, Debug)]
pub struct PercentileEnhancer {
    pub low: f32,
    pub high: f32,
}

impl PercentileEnhancer {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }
}

impl Default for PercentileEnhancer {
    fn default() -> Self {
        Self::new(1.0, 99.0)
    }
}

impl Enhancer for PercentileEnhancer {
    fn enhance(&self, img: &ImageF32) -> ImageF32 {
        let mut values: Vec<f32> = img.rows().flatten().copied().collect();
        if values.is_empty() {
            return img.clone();
        }
        values.sort_by(f32::total_cmp);
        let lo = percentile(&values, self.low);
        let hi = percentile(&values, self.high);
        if hi - lo <= f32::EPSILON {
            return img.clone();
        }
        let mut out = ImageF32::new(img.w, img.h);
        for (dst, &v) in out.data.iter_mut().zip(img.rows().flatten()) {
            *dst = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
        }
        out
    }
}

/// Nearest-rank percentile of sorted `values`, `p` in [0, 100].
fn percentile(values: &[f32], p: f32) -> f32 {
    let last = values.len() - 1;
    let rank = ((p.clamp(0.0, 100.0) / 100.0) * last as f32).round() as usize;
    values[rank.min(last)]
}

/// Whether the page has gray levels between paper and ink.
///
/// The value range is split into ten bins; a page is two-tone when every
/// value falls into the lowest bin or the two highest bins.
pub fn has_mid_tones(img: &ImageF32) -> bool {
    let (mut min, mut max) = (f32::INFINITY, f32::NEG_INFINITY);
    for &v in img.rows().flatten() {
        min = min.min(v);
        max = max.max(v);
    }
    if max <= min {
        return false;
    }
    let width = (max - min) / HISTOGRAM_BINS as f32;
    img.rows().flatten().any(|&v| {
        let bin = (((v - min) / width) as usize).min(HISTOGRAM_BINS - 1);
        (1..HISTOGRAM_BINS - 2).contains(&bin)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(values: &[f32], w: usize) -> ImageF32 {
        let mut img = ImageF32::new(w, values.len() / w);
        img.data.copy_from_slice(values);
        img
    }

    #[test]
    fn two_tone_pages_have_no_mid_tones() {
        assert!(!has_mid_tones(&page(&[0.0, 1.0, 1.0, 0.0], 2)));
        assert!(!has_mid_tones(&page(&[1.0; 4], 2)));
        assert!(has_mid_tones(&page(&[0.0, 0.5, 1.0, 1.0], 2)));
    }

    #[test]
    fn second_lowest_bin_counts_as_mid_tone_but_second_highest_does_not() {
        assert!(has_mid_tones(&page(&[0.0, 0.15, 1.0, 1.0], 2)));
        assert!(!has_mid_tones(&page(&[0.0, 0.85, 1.0, 1.0], 2)));
    }

    #[test]
    fn stretch_maps_percentiles_to_full_range() {
        let values: Vec<f32> = (0..=100).map(|v| 0.2 + 0.006 * v as f32).collect();
        let img = page(&values, 101);
        let out = PercentileEnhancer::new(0.0, 100.0).enhance(&img);
        assert!(out.data[0].abs() < 1e-6);
        assert!((out.data[100] - 1.0).abs() < 1e-6);
        assert!((out.data[50] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn flat_page_is_left_alone() {
        let img = page(&[0.7; 6], 3);
        let out = PercentileEnhancer::default().enhance(&img);
        assert_eq!(out.data, img.data);
    }
}
