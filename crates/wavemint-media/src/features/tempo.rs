//! Tempo estimation from inter-peak intervals.

use wavemint_models::SignalSample;

/// Tempo reported when the peaks carry no usable rhythm.
pub const DEFAULT_BPM: u32 = 120;
pub const MIN_BPM: u32 = 60;
pub const MAX_BPM: u32 = 180;

/// Inter-peak intervals outside this open range (seconds) are ignored.
const MIN_BEAT_INTERVAL: f64 = 0.2;
const MAX_BEAT_INTERVAL: f64 = 1.0;

/// Estimate beats per minute from peak timestamps.
///
/// Returns [`DEFAULT_BPM`] with fewer than two peaks or when no interval
/// falls in `(0.2, 1.0)` seconds.
pub fn estimate_bpm(peaks: &[SignalSample]) -> u32 {
    if peaks.len() < 2 {
        return DEFAULT_BPM;
    }

    let (sum, count) = peaks
        .windows(2)
        .map(|pair| pair[1].time - pair[0].time)
        .filter(|d| *d > MIN_BEAT_INTERVAL && *d < MAX_BEAT_INTERVAL)
        .fold((0.0, 0usize), |(sum, count), d| (sum + d, count + 1));

    if count == 0 {
        return DEFAULT_BPM;
    }

    let mean = sum / count as f64;
    let bpm = (60.0 / mean).round();
    bpm.clamp(MIN_BPM as f64, MAX_BPM as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peaks_at(times: &[f64]) -> Vec<SignalSample> {
        times.iter().map(|t| SignalSample::new(*t, -10.0)).collect()
    }

    #[test]
    fn test_too_few_peaks() {
        assert_eq!(estimate_bpm(&[]), DEFAULT_BPM);
        assert_eq!(estimate_bpm(&peaks_at(&[3.0])), DEFAULT_BPM);
    }

    #[test]
    fn test_half_second_spacing() {
        assert_eq!(estimate_bpm(&peaks_at(&[0.0, 0.5, 1.0, 1.5])), 120);
    }

    #[test]
    fn test_intervals_outside_range_ignored() {
        // 0.1 and 2.0 are filtered; only the 0.4 s gaps count.
        assert_eq!(estimate_bpm(&peaks_at(&[0.0, 0.1, 0.5, 0.9, 2.9])), 150);
        assert_eq!(estimate_bpm(&peaks_at(&[0.0, 2.0, 4.0])), DEFAULT_BPM);
        // Boundaries are exclusive.
        assert_eq!(estimate_bpm(&peaks_at(&[0.0, 1.0, 2.0])), DEFAULT_BPM);
    }

    #[test]
    fn test_clamped_to_range() {
        // 0.21 s gaps would be ~286 BPM.
        assert_eq!(estimate_bpm(&peaks_at(&[0.0, 0.21, 0.42, 0.63])), MAX_BPM);
        // 0.99 s gaps round to 61 BPM and stay inside.
        assert_eq!(estimate_bpm(&peaks_at(&[0.0, 0.99, 1.98])), 61);
    }

    #[test]
    fn test_always_in_range() {
        let mut t = 0.0;
        let mut times = Vec::new();
        for i in 0..200 {
            t += 0.05 + (i % 23) as f64 * 0.05;
            times.push(t);
        }
        let bpm = estimate_bpm(&peaks_at(&times));
        assert!((MIN_BPM..=MAX_BPM).contains(&bpm));
    }
}
