//! Analysis and segmentation parameters.
//!
//! Every stage of the pipeline reads its thresholds from an
//! [`AnalysisConfig`] instead of embedded literals, so a whole run can be
//! replayed deterministically with a different parameter set.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest clip the segmenter produces (seconds).
pub const DEFAULT_MIN_CLIP_SECS: f64 = 6.0;
/// Longest clip the segmenter produces (seconds).
pub const DEFAULT_MAX_CLIP_SECS: f64 = 15.0;
/// Level under which audio counts as silent (dB).
pub const DEFAULT_SILENCE_THRESHOLD_DB: f64 = -35.0;
/// Minimum length of a reported silence (seconds).
pub const DEFAULT_SILENCE_MIN_DURATION_SECS: f64 = 0.4;
/// Gap under which neighbouring silences are merged (seconds).
pub const DEFAULT_SILENCE_MERGE_TOLERANCE_SECS: f64 = 0.1;
/// RMS floor a smoothed peak must exceed (dB).
pub const DEFAULT_PEAK_FLOOR_DB: f64 = -25.0;
/// Relative threshold for normalized energy spikes.
pub const DEFAULT_ENERGY_SPIKE_THRESHOLD: f64 = 0.45;
/// Moving average window, in samples.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 8;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("min_length must be positive, got {0}")]
    NonPositiveMinLength(f64),

    #[error("min_length ({min}) exceeds max_length ({max})")]
    InvertedLengthBounds { min: f64, max: f64 },

    #[error("energy_spike_threshold must lie in [0, 1], got {0}")]
    SpikeThresholdOutOfRange(f64),

    #[error("{field} must be a finite non-negative number, got {value}")]
    InvalidDuration { field: &'static str, value: f64 },
}

/// Parameters shared by feature extraction and segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisConfig {
    /// Minimum segment duration in seconds
    #[serde(default = "default_min_length")]
    pub min_length: f64,

    /// Maximum segment duration in seconds
    #[serde(default = "default_max_length")]
    pub max_length: f64,

    /// Silence detection threshold in dB
    #[serde(default = "default_silence_threshold_db")]
    pub silence_threshold_db: f64,

    /// Minimum silence duration reported by the engine, in seconds
    #[serde(default = "default_silence_min_duration")]
    pub silence_min_duration: f64,

    /// Neighbouring silences closer than this are merged, in seconds
    #[serde(default = "default_silence_merge_tolerance")]
    pub silence_merge_tolerance: f64,

    /// Floor a smoothed RMS peak must exceed, in dB
    #[serde(default = "default_peak_floor_db")]
    pub peak_floor_db: f64,

    /// Relative threshold for normalized energy spikes (0.0-1.0)
    #[serde(default = "default_energy_spike_threshold")]
    pub energy_spike_threshold: f64,

    /// Moving average window for the RMS envelope, in samples
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
}

fn default_min_length() -> f64 {
    DEFAULT_MIN_CLIP_SECS
}
fn default_max_length() -> f64 {
    DEFAULT_MAX_CLIP_SECS
}
fn default_silence_threshold_db() -> f64 {
    DEFAULT_SILENCE_THRESHOLD_DB
}
fn default_silence_min_duration() -> f64 {
    DEFAULT_SILENCE_MIN_DURATION_SECS
}
fn default_silence_merge_tolerance() -> f64 {
    DEFAULT_SILENCE_MERGE_TOLERANCE_SECS
}
fn default_peak_floor_db() -> f64 {
    DEFAULT_PEAK_FLOOR_DB
}
fn default_energy_spike_threshold() -> f64 {
    DEFAULT_ENERGY_SPIKE_THRESHOLD
}
fn default_smoothing_window() -> usize {
    DEFAULT_SMOOTHING_WINDOW
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_CLIP_SECS,
            max_length: DEFAULT_MAX_CLIP_SECS,
            silence_threshold_db: DEFAULT_SILENCE_THRESHOLD_DB,
            silence_min_duration: DEFAULT_SILENCE_MIN_DURATION_SECS,
            silence_merge_tolerance: DEFAULT_SILENCE_MERGE_TOLERANCE_SECS,
            peak_floor_db: DEFAULT_PEAK_FLOOR_DB,
            energy_spike_threshold: DEFAULT_ENERGY_SPIKE_THRESHOLD,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
        }
    }
}

impl AnalysisConfig {
    /// Builder-style setter for the clip duration bounds.
    pub fn with_length_bounds(mut self, min_length: f64, max_length: f64) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// Builder-style setter for the smoothing window.
    pub fn with_smoothing_window(mut self, window: usize) -> Self {
        self.smoothing_window = window;
        self
    }

    /// Builder-style setter for the peak floor.
    pub fn with_peak_floor_db(mut self, floor_db: f64) -> Self {
        self.peak_floor_db = floor_db;
        self
    }

    /// Builder-style setter for the energy spike threshold.
    pub fn with_energy_spike_threshold(mut self, threshold: f64) -> Self {
        self.energy_spike_threshold = threshold;
        self
    }

    /// Check the invariants the segmenter relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_length > 0.0) || !self.min_length.is_finite() {
            return Err(ConfigError::NonPositiveMinLength(self.min_length));
        }
        if !(self.min_length <= self.max_length) || !self.max_length.is_finite() {
            return Err(ConfigError::InvertedLengthBounds {
                min: self.min_length,
                max: self.max_length,
            });
        }
        if !(0.0..=1.0).contains(&self.energy_spike_threshold) {
            return Err(ConfigError::SpikeThresholdOutOfRange(
                self.energy_spike_threshold,
            ));
        }
        for (field, value) in [
            ("silence_min_duration", self.silence_min_duration),
            ("silence_merge_tolerance", self.silence_merge_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDuration { field, value });
            }
        }
        Ok(())
    }
}
