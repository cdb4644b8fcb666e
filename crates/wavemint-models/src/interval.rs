//! Time ranges: silence intervals and output segments.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A time range where the audio stays below the silence threshold.
///
/// Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SilenceInterval {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl SilenceInterval {
    /// Create an interval, rejecting reversed or non-finite bounds.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if start.is_finite() && end.is_finite() && start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `t` lies strictly between the interval edges.
    pub fn encloses(&self, t: f64) -> bool {
        self.start < t && t < self.end
    }
}

/// A contiguous time range chosen as one output clip.
///
/// Invariant: `start < end`. Segment lists are ordered by `start` and
/// pairwise non-overlapping; touching endpoints are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl Segment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_interval_validation() {
        assert!(SilenceInterval::new(1.0, 2.0).is_some());
        assert!(SilenceInterval::new(2.0, 2.0).is_some());
        assert!(SilenceInterval::new(2.0, 1.0).is_none());
        assert!(SilenceInterval::new(f64::NAN, 1.0).is_none());
    }

    #[test]
    fn test_encloses_is_strict() {
        let interval = SilenceInterval::new(1.0, 2.0).unwrap();
        assert!(interval.encloses(1.5));
        assert!(!interval.encloses(1.0));
        assert!(!interval.encloses(2.0));
    }

    #[test]
    fn test_segment_duration() {
        let segment = Segment::new(6.0, 12.5);
        assert!((segment.duration() - 6.5).abs() < 1e-9);
    }
}
