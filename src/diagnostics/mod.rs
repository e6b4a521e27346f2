//! Diagnostics returned alongside the detected staff systems.
//!
//! `DetectionReport` bundles the systems with a `PipelineTrace` that records
//! the measured staff geometry, how many candidates survived each stage and
//! where the time went. Everything serializes to camelCase JSON.

pub mod pipeline;
pub mod timing;

pub use pipeline::{DetectionReport, InputDescriptor, PipelineTrace, StageCounts};
pub use timing::{StageTiming, TimingBreakdown};
