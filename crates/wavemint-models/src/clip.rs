//! Rendered clip and run result models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{JobId, Segment};

/// Which segmentation path produced a run's segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationStrategy {
    /// Segments snapped to the beat grid
    BeatGrid,
    /// Segments strided over energy spikes
    EnergySpikes,
    /// No usable rhythm signal; one clip from the media start
    WholeMedia,
}

impl SegmentationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentationStrategy::BeatGrid => "beat_grid",
            SegmentationStrategy::EnergySpikes => "energy_spikes",
            SegmentationStrategy::WholeMedia => "whole_media",
        }
    }
}

impl fmt::Display for SegmentationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered output clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderedClip {
    /// Position in the segment list
    pub index: usize,
    /// Start time in the source, seconds
    pub start: f64,
    /// End time in the source, seconds
    pub end: f64,
    /// Clip duration, seconds
    pub duration: f64,
    /// Base64 encoded mp4 payload
    pub buffer: String,
}

impl RenderedClip {
    pub fn new(index: usize, segment: &Segment, buffer: String) -> Self {
        Self {
            index,
            start: segment.start,
            end: segment.end,
            duration: segment.duration(),
            buffer,
        }
    }
}

/// Successful result of one slicing run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SliceResponse {
    /// Always "success"
    pub status: String,
    pub job_id: JobId,
    /// Estimated tempo of the analysis track
    pub bpm: u32,
    pub strategy: SegmentationStrategy,
    pub clips: Vec<RenderedClip>,
    pub completed_at: DateTime<Utc>,
}

impl SliceResponse {
    pub fn success(
        job_id: JobId,
        bpm: u32,
        strategy: SegmentationStrategy,
        clips: Vec<RenderedClip>,
    ) -> Self {
        Self {
            status: "success".to_string(),
            job_id,
            bpm,
            strategy,
            clips,
            completed_at: Utc::now(),
        }
    }
}

/// Failure payload for a run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    /// The single error reported when any stage of a run fails.
    pub fn processing_failed(details: impl Into<String>) -> Self {
        Self {
            error: "processing_failed".to_string(),
            details: details.into(),
        }
    }
}
