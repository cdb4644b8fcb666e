//! Shared data models for the Wavemint slicing pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Scalar signal samples and derived point features (beats, energy spikes)
//! - Silence intervals and output segments
//! - Analysis and encoding configuration
//! - Run identifiers and rendered clip results

pub mod clip;
pub mod config;
pub mod encoding;
pub mod interval;
pub mod job;
pub mod signal;

// Re-export common types
pub use clip::{ErrorResponse, RenderedClip, SegmentationStrategy, SliceResponse};
pub use config::{AnalysisConfig, ConfigError};
pub use encoding::{EncodingConfig, RenderTarget};
pub use interval::{Segment, SilenceInterval};
pub use job::JobId;
pub use signal::{last_sample_time, Beat, EnergySpike, SignalMetric, SignalSample};
