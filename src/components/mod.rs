//! Connected components of the run-length filtered page.
//!
//! Overview
//! - [`extract_connected_components`] labels 8-connected regions with
//!   `imageproc` after [`close_row_gaps`] has bridged gaps of at most
//!   `merge_gap` pixels on each row. Every region is returned as the
//!   horizontal runs it covers.
//! - [`normalize_connected_components`] drops degenerate components and turns
//!   every survivor into a per-column polyline (mean row per column), the
//!   shape consumed by the line builder.
//!
//! Components are kept as run lists, not label images.

mod extractor;
mod normalize;

pub use extractor::{close_row_gaps, extract_connected_components, ConnectedComponent, Run};
pub use normalize::{normalize_connected_components, Component};
