//! Page preparation ahead of staff-line detection.
//!
//! Modules
//! - `enhance` – [`Enhancer`] trait and the percentile contrast stretch.
//! - `binarize` – [`Binarizer`] trait and the Otsu implementation.
//! - `classifier` – [`PixelClassifier`] seam for an external pixel model.
//! - [`options`] – tunables shared by the preparation steps.
//!
//! All images here use the page convention of [`ImageF32`](crate::image::ImageF32):
//! 0 is ink, 1 is paper. Binary outputs mark ink with `true`.

mod binarize;
mod classifier;
mod enhance;
pub mod options;

pub use binarize::{Binarizer, OtsuBinarizer};
pub use classifier::PixelClassifier;
pub use enhance::{has_mid_tones, Enhancer, PercentileEnhancer};
pub use options::PreprocessOptions;
