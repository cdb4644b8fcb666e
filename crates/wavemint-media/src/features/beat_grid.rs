//! Evenly spaced beat grid anchored at the first peak.

use wavemint_models::{Beat, SignalSample};

/// Build beats at `first + k * 60 / bpm` strictly before the last peak.
///
/// Empty peaks (or a zero tempo) give an empty grid. A single peak gives an
/// empty grid too, since nothing lies strictly before itself.
pub fn build_beat_grid(peaks: &[SignalSample], bpm: u32) -> Vec<Beat> {
    let (Some(first), Some(last)) = (peaks.first(), peaks.last()) else {
        return Vec::new();
    };
    if bpm == 0 {
        return Vec::new();
    }

    let beat_len = 60.0 / bpm as f64;
    (0u64..)
        .map(|k| first.time + k as f64 * beat_len)
        .take_while(|t| *t < last.time)
        .map(Beat::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peaks_at(times: &[f64]) -> Vec<SignalSample> {
        times.iter().map(|t| SignalSample::new(*t, -10.0)).collect()
    }

    #[test]
    fn test_empty_peaks() {
        assert!(build_beat_grid(&[], 120).is_empty());
    }

    #[test]
    fn test_single_peak() {
        assert!(build_beat_grid(&peaks_at(&[1.0]), 120).is_empty());
    }

    #[test]
    fn test_grid_spacing_and_bounds() {
        let grid = build_beat_grid(&peaks_at(&[0.25, 0.7, 3.25]), 120);
        let times: Vec<f64> = grid.iter().map(|b| b.time).collect();

        assert_eq!(times, vec![0.25, 0.75, 1.25, 1.75, 2.25, 2.75]);
    }

    #[test]
    fn test_grid_strictly_increasing_and_even() {
        let grid = build_beat_grid(&peaks_at(&[1.3, 40.0]), 97);
        let beat_len = 60.0 / 97.0;

        assert!(!grid.is_empty());
        assert_eq!(grid[0].time, 1.3);
        for pair in grid.windows(2) {
            assert!(pair[1].time > pair[0].time);
            assert!((pair[1].time - pair[0].time - beat_len).abs() < 1e-9);
        }
        assert!(grid.last().unwrap().time < 40.0);
    }
}
