//! Phrase segmentation: fuse beats, silences and energy spikes into clips.
//!
//! Three strategies are tried in order:
//!
//! 1. **Beat grid**: longest beat-aligned segments within the length bounds,
//!    with interior boundaries steered out of silence.
//! 2. **Energy spikes**: when the grid is empty or too short for a single
//!    segment, segments start on every third spike.
//! 3. **Whole media**: when both produce nothing, a single segment from the
//!    start of the media, so non-empty media always yields a clip.
//!
//! Segmentation is a pure function of its inputs.

mod beats;
mod silence_map;
mod spikes;

use tracing::debug;

use wavemint_models::{
    AnalysisConfig, Beat, EnergySpike, Segment, SegmentationStrategy, SilenceInterval,
};

use silence_map::SilenceMap;

/// Slack for comparisons on beat arithmetic.
pub(crate) const EPSILON: f64 = 1e-9;

/// Segments chosen for one run and the strategy that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationPlan {
    pub segments: Vec<Segment>,
    pub strategy: SegmentationStrategy,
}

impl SegmentationPlan {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Describe the first broken ordering or bounds invariant, if any.
    ///
    /// Only whole-media and energy-spike plans may end below `min_length`,
    /// and only by being clamped to the end of the media.
    pub fn first_violation(
        &self,
        config: &AnalysisConfig,
        media_duration: f64,
    ) -> Option<String> {
        for (i, seg) in self.segments.iter().enumerate() {
            if !(seg.start < seg.end) {
                return Some(format!("segment {} is empty: {:?}", i, seg));
            }
            if seg.start < -EPSILON || seg.end > media_duration + EPSILON {
                return Some(format!("segment {} leaves the media: {:?}", i, seg));
            }
            if seg.duration() > config.max_length + EPSILON {
                return Some(format!(
                    "segment {} is longer than {}s: {:?}",
                    i, config.max_length, seg
                ));
            }
            let clamped = self.strategy != SegmentationStrategy::BeatGrid
                && (seg.end - media_duration).abs() <= EPSILON;
            if seg.duration() < config.min_length - EPSILON && !clamped {
                return Some(format!(
                    "segment {} is shorter than {}s: {:?}",
                    i, config.min_length, seg
                ));
            }
        }

        self.segments
            .windows(2)
            .position(|pair| pair[1].start < pair[0].end - EPSILON)
            .map(|i| format!("segments {} and {} overlap or are out of order", i, i + 1))
    }
}

/// Choose clip segments for media of `media_duration` seconds.
///
/// `silences` must be sorted by start and merged. Returns no segments only
/// when `media_duration` is not positive.
pub fn segment_phrases(
    beats: &[Beat],
    silences: &[SilenceInterval],
    spikes: &[EnergySpike],
    config: &AnalysisConfig,
    media_duration: f64,
) -> SegmentationPlan {
    if !(media_duration > 0.0) || !media_duration.is_finite() {
        return SegmentationPlan {
            segments: Vec::new(),
            strategy: SegmentationStrategy::WholeMedia,
        };
    }

    let silence_map = SilenceMap::new(silences);

    let mut plan = SegmentationPlan {
        segments: beats::segment_on_grid(beats, silence_map, config, media_duration),
        strategy: SegmentationStrategy::BeatGrid,
    };

    if plan.is_empty() {
        plan = SegmentationPlan {
            segments: spikes::segment_on_spikes(spikes, silence_map, config, media_duration),
            strategy: SegmentationStrategy::EnergySpikes,
        };
    }

    if plan.is_empty() {
        plan = SegmentationPlan {
            segments: vec![Segment::new(0.0, config.max_length.min(media_duration))],
            strategy: SegmentationStrategy::WholeMedia,
        };
    }

    debug_assert!(
        plan.first_violation(config, media_duration).is_none(),
        "{:?}",
        plan.first_violation(config, media_duration)
    );

    debug!(
        strategy = %plan.strategy,
        segments = plan.segments.len(),
        beats = beats.len(),
        silences = silences.len(),
        spikes = spikes.len(),
        "Segmented media"
    );

    plan
}
