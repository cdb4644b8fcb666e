//! Energy-spike segmentation, used when the beat grid cannot hold a segment.

use wavemint_models::{AnalysisConfig, EnergySpike, Segment};

use super::silence_map::{edges_by_distance, SilenceMap};
use super::EPSILON;

/// Spikes advanced per candidate start.
const SPIKE_STRIDE: usize = 3;

/// Cut segments starting on every third spike, then steer interior
/// boundaries out of silence.
pub(crate) fn segment_on_spikes(
    spikes: &[EnergySpike],
    silences: SilenceMap<'_>,
    config: &AnalysisConfig,
    media_end: f64,
) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for i in (0..spikes.len().saturating_sub(1)).step_by(SPIKE_STRIDE) {
        let start = spikes[i].time;
        if start >= media_end {
            break;
        }
        if segments.last().is_some_and(|prev| start < prev.end - EPSILON) {
            continue;
        }

        let mut end = start + config.max_length;
        if let Some(ahead) = spikes.get(i + SPIKE_STRIDE) {
            end = end.min(ahead.time);
        }
        if end - start < config.min_length {
            end = start + config.min_length;
        }
        end = end.min(media_end);

        if end > start {
            segments.push(Segment::new(start, end));
        }
    }

    avoid_silence(&mut segments, silences, config, media_end);
    segments
}

/// Move interior boundaries that sit strictly inside silence.
///
/// Starts move forward to the silence end while the segment stays at least
/// `min_length`. Ends move to the nearer edge that keeps the length in
/// bounds without crossing the next segment's start.
fn avoid_silence(
    segments: &mut [Segment],
    silences: SilenceMap<'_>,
    config: &AnalysisConfig,
    media_end: f64,
) {
    let count = segments.len();

    for segment in segments.iter_mut().skip(1) {
        if let Some(silence) = silences.enclosing(segment.start) {
            if segment.end - silence.end >= config.min_length - EPSILON {
                segment.start = silence.end;
            }
        }
    }

    for k in 0..count.saturating_sub(1) {
        let Segment { start, end } = segments[k];
        let next_start = segments[k + 1].start;

        let Some(silence) = silences.enclosing(end) else {
            continue;
        };

        let edge = edges_by_distance(silence, end).into_iter().find(|&t| {
            let length = t - start;
            length >= config.min_length - EPSILON
                && length <= config.max_length + EPSILON
                && t <= next_start + EPSILON
                && t <= media_end + EPSILON
        });
        if let Some(edge) = edge {
            segments[k].end = edge;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavemint_models::SilenceInterval;

    fn spikes_at(times: &[f64]) -> Vec<EnergySpike> {
        times.iter().map(|t| EnergySpike { time: *t, level: 0.9 }).collect()
    }

    fn fallback(spikes: &[EnergySpike], silences: &[SilenceInterval], end: f64) -> Vec<Segment> {
        segment_on_spikes(spikes, SilenceMap::new(silences), &AnalysisConfig::default(), end)
    }

    fn bounds(segments: &[Segment]) -> Vec<(f64, f64)> {
        segments.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_stride_and_end_rule() {
        let spikes = spikes_at(&[0.0, 1.0, 2.0, 10.0, 11.0, 12.0, 40.0, 41.0]);
        let segments = fallback(&spikes, &[], 60.0);

        // i=0: spike 3 at 10 caps the end. i=3: spike 6 at 40 is past start+max.
        // i=6: no spike 9, start+max.
        assert_eq!(bounds(&segments), vec![(0.0, 10.0), (10.0, 25.0), (40.0, 55.0)]);
    }

    #[test]
    fn test_short_span_extended_to_min() {
        let spikes = spikes_at(&[0.0, 0.5, 1.0, 2.0, 9.0]);
        let segments = fallback(&spikes, &[], 60.0);

        // i=0 ends at spike 3 (2.0), extended to 6.0. i=3 starts at 2.0 < 6.0, skipped.
        assert_eq!(bounds(&segments), vec![(0.0, 6.0)]);
    }

    #[test]
    fn test_clamped_to_media_end() {
        let spikes = spikes_at(&[0.0, 1.0, 2.0, 8.0, 9.0]);
        let segments = fallback(&spikes, &[], 12.0);

        assert_eq!(bounds(&segments), vec![(0.0, 8.0), (8.0, 12.0)]);
    }

    #[test]
    fn test_single_or_no_spike() {
        assert!(fallback(&[], &[], 20.0).is_empty());
        assert!(fallback(&spikes_at(&[3.0]), &[], 20.0).is_empty());
    }

    #[test]
    fn test_start_past_media_end() {
        let spikes = spikes_at(&[25.0, 26.0]);
        assert!(fallback(&spikes, &[], 20.0).is_empty());
    }

    #[test]
    fn test_interior_boundaries_leave_silence() {
        let spikes = spikes_at(&[0.0, 1.0, 2.0, 10.0, 11.0, 12.0, 40.0, 41.0]);
        let silences = [
            SilenceInterval::new(9.5, 10.5).unwrap(),
            SilenceInterval::new(24.0, 26.0).unwrap(),
        ];
        let segments = fallback(&spikes, &silences, 60.0);

        // Segment 2 starts at 10 inside [9.5, 10.5] and moves to 10.5.
        // Segment 1 ends at 10, nearer edge 9.5 is viable.
        // Segment 2 ends at 25 inside [24, 26]; 24 (tie, start edge first) keeps 13.5 s.
        assert_eq!(bounds(&segments), vec![(0.0, 9.5), (10.5, 24.0), (40.0, 55.0)]);
    }

    #[test]
    fn test_first_start_and_last_end_untouched() {
        let spikes = spikes_at(&[1.0, 2.0]);
        let silences = [
            SilenceInterval::new(0.0, 1.5).unwrap(),
            SilenceInterval::new(15.0, 17.0).unwrap(),
        ];
        let segments = fallback(&spikes, &silences, 30.0);

        assert_eq!(bounds(&segments), vec![(1.0, 16.0)]);
    }
}
