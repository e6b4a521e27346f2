//! Final polyline shaping.
//!
//! - [`smooth_lines`]: low-pass projection of the rows of each line onto
//!   slow cosine modes and a linear trend; a second pass is a no-op.
//! - [`smooth_lines_advanced`]: robust local linear regression, stronger and
//!   insensitive to samples pulled away by glyphs sitting on the line.
//! - [`line_fitting`]: Ramer–Douglas–Peucker reduction with a bounded
//!   perpendicular deviation.
//!
//! Columns are never moved; smoothing only rewrites rows.

mod advanced;
mod fitting;
mod lowpass;

pub use advanced::{smooth_line_advanced, smooth_lines_advanced};
pub use fitting::{fit_line, line_fitting};
pub use lowpass::{smooth_line, smooth_lines};

use serde::{Deserialize, Serialize};

/// Smoothing applied after system construction; configured as 0, 1 or 2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SmoothingMode {
    #[default]
    Off,
    LowPass,
    Advanced,
}

impl TryFrom<u8> for SmoothingMode {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Off),
            1 => Ok(Self::LowPass),
            2 => Ok(Self::Advanced),
            other => Err(format!("smooth_lines must be 0, 1 or 2, got {other}")),
        }
    }
}

impl From<SmoothingMode> for u8 {
    fn from(mode: SmoothingMode) -> Self {
        match mode {
            SmoothingMode::Off => 0,
            SmoothingMode::LowPass => 1,
            SmoothingMode::Advanced => 2,
        }
    }
}
