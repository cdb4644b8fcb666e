//! Strict local-maximum picking.

use wavemint_models::SignalSample;

/// Indices of strict local maxima whose value exceeds `floor`.
///
/// A sample qualifies when it is greater than both neighbours; the first and
/// last samples have only one neighbour and never qualify. Plateaus produce
/// no peak.
pub(crate) fn local_maxima<T>(values: &[T], floor: f64, value: impl Fn(&T) -> f64) -> Vec<usize> {
    if values.len() < 3 {
        return Vec::new();
    }

    (1..values.len() - 1)
        .filter(|&i| {
            let cur = value(&values[i]);
            cur > value(&values[i - 1]) && cur > value(&values[i + 1]) && cur > floor
        })
        .collect()
}

/// Detect peaks in a smoothed RMS envelope.
///
/// RMS levels are negative dB, so a peak is the least negative point of its
/// neighbourhood and must sit above `floor_db`.
pub fn detect_peaks(smoothed: &[SignalSample], floor_db: f64) -> Vec<SignalSample> {
    local_maxima(smoothed, floor_db, |s| s.value)
        .into_iter()
        .map(|i| smoothed[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::envelope::smooth_envelope;

    fn series(values: &[f64]) -> Vec<SignalSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SignalSample::new(i as f64 * 0.1, *v))
            .collect()
    }

    #[test]
    fn test_strict_maxima_above_floor() {
        let input = series(&[-30.0, -10.0, -30.0, -28.0, -27.0, -40.0, -5.0]);
        let peaks = detect_peaks(&input, -25.0);

        // -27 is a local maximum but below the floor; the last sample has no right neighbour.
        assert_eq!(peaks, vec![input[1]]);
    }

    #[test]
    fn test_ties_are_not_peaks() {
        let input = series(&[-30.0, -10.0, -10.0, -30.0]);
        assert!(detect_peaks(&input, -25.0).is_empty());
    }

    #[test]
    fn test_short_series() {
        assert!(detect_peaks(&series(&[-1.0, -2.0]), -25.0).is_empty());
        assert!(detect_peaks(&[], -25.0).is_empty());
    }

    #[test]
    fn test_smoothing_scenario() {
        let input = series(&[-10.0, -30.0, -8.0, -30.0, -6.0]);

        // Raw: only the middle sample is a strict local maximum.
        let raw_peaks = detect_peaks(&smooth_envelope(&input, 0), -25.0);
        assert_eq!(raw_peaks.len(), 1);
        assert_eq!(raw_peaks[0].time, input[2].time);

        // Window 1 flattens the series to [-10, -20, -19, -19, -18]; no strict maxima survive.
        assert!(detect_peaks(&smooth_envelope(&input, 1), -25.0).is_empty());
    }
}
