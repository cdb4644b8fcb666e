//! Scalar signal series and the point features derived from them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One point of a raw or smoothed scalar series.
///
/// Series are ordered by non-decreasing `time`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SignalSample {
    /// Time in seconds from the start of the audio track
    pub time: f64,
    /// Level in the unit of the metric (dB-like for RMS and peak levels)
    pub value: f64,
}

impl SignalSample {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Which per-frame level the signal source reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SignalMetric {
    /// Root-mean-square level, used for beat and tempo work
    Rms,
    /// Peak level, used for energy spikes
    Peak,
}

impl SignalMetric {
    /// Frame metadata key written by FFmpeg's `astats` filter.
    pub fn astats_key(&self) -> &'static str {
        match self {
            SignalMetric::Rms => "lavfi.astats.Overall.RMS_level",
            SignalMetric::Peak => "lavfi.astats.Overall.Peak_level",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalMetric::Rms => "rms",
            SignalMetric::Peak => "peak",
        }
    }
}

impl fmt::Display for SignalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point on the inferred beat grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Beat {
    /// Time in seconds
    pub time: f64,
}

impl Beat {
    pub fn new(time: f64) -> Self {
        Self { time }
    }
}

/// A locally maximal normalized energy sample above the spike threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnergySpike {
    /// Time in seconds
    pub time: f64,
    /// Normalized level in `[0, 1]`
    pub level: f64,
}

/// Latest timestamp found in a series, if any.
pub fn last_sample_time(samples: &[SignalSample]) -> Option<f64> {
    samples.iter().map(|s| s.time).reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_astats_keys() {
        assert_eq!(SignalMetric::Rms.astats_key(), "lavfi.astats.Overall.RMS_level");
        assert_eq!(SignalMetric::Peak.astats_key(), "lavfi.astats.Overall.Peak_level");
    }

    #[test]
    fn test_metric_serialization() {
        let json = serde_json::to_string(&SignalMetric::Rms).unwrap();
        assert_eq!(json, "\"rms\"");
    }

    #[test]
    fn test_last_sample_time() {
        assert_eq!(last_sample_time(&[]), None);
        let series = [SignalSample::new(0.0, -10.0), SignalSample::new(2.5, -12.0)];
        assert_eq!(last_sample_time(&series), Some(2.5));
    }
}
