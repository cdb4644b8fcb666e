//! Beat-grid segmentation.

use wavemint_models::{AnalysisConfig, Beat, Segment};

use super::silence_map::{edges_by_distance, SilenceMap};
use super::EPSILON;

/// Walk the grid from its first beat, emitting the longest in-bounds
/// beat-aligned segment at each step and steering interior boundaries out
/// of silence.
pub(crate) fn segment_on_grid(
    beats: &[Beat],
    silences: SilenceMap<'_>,
    config: &AnalysisConfig,
    media_end: f64,
) -> Vec<Segment> {
    let Some(first) = beats.first() else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    let mut last_aligned_end = None;
    let mut start = first.time;

    loop {
        let candidates = candidate_ends(beats, start, config, media_end);
        let Some(&aligned) = candidates.last() else {
            break;
        };

        let end = steer_end(start, aligned, silences, config, media_end);
        segments.push(Segment::new(start, end));
        last_aligned_end = Some(aligned);

        // A start inside (or opening) a silence moves to where the sound resumes.
        start = match silences.opening_at(end) {
            Some(silence) => silence.end,
            None => end,
        };
    }

    // The run's final end stays on the grid.
    if let (Some(last), Some(aligned)) = (segments.last_mut(), last_aligned_end) {
        last.end = aligned;
    }

    segments
}

/// Beat times at `[min, max]` seconds from `start` that fit in the media, ascending.
fn candidate_ends(beats: &[Beat], start: f64, config: &AnalysisConfig, media_end: f64) -> Vec<f64> {
    beats
        .iter()
        .map(|b| b.time)
        .filter(|&t| {
            let length = t - start;
            length >= config.min_length - EPSILON
                && length <= config.max_length + EPSILON
                && t <= media_end + EPSILON
        })
        .collect()
}

/// Move an end that falls inside silence to the nearer viable silence edge.
///
/// An edge is viable when the length stays in bounds and the edge fits in
/// the media. Every shorter candidate beat lies inside the same silence, so
/// with no viable edge the aligned beat is kept.
fn steer_end(
    start: f64,
    aligned: f64,
    silences: SilenceMap<'_>,
    config: &AnalysisConfig,
    media_end: f64,
) -> f64 {
    let Some(silence) = silences.enclosing(aligned) else {
        return aligned;
    };

    edges_by_distance(silence, aligned)
        .into_iter()
        .find(|&t| {
            let length = t - start;
            length >= config.min_length - EPSILON
                && length <= config.max_length + EPSILON
                && t <= media_end + EPSILON
        })
        .unwrap_or(aligned)
}
