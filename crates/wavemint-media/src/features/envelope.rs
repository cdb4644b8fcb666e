//! Causal moving-average smoothing of a level series.

use wavemint_models::SignalSample;

/// Smooth `samples` with a causal moving average.
///
/// Output sample `i` is the mean of input samples `max(0, i - window)..=i`,
/// so each point averages up to `window + 1` values and never looks ahead.
/// Near the start the window shrinks instead of padding.
pub fn smooth_envelope(samples: &[SignalSample], window: usize) -> Vec<SignalSample> {
    let mut smoothed = Vec::with_capacity(samples.len());
    let mut running_sum = 0.0;

    for (i, sample) in samples.iter().enumerate() {
        running_sum += sample.value;
        if i > window {
            running_sum -= samples[i - window - 1].value;
        }

        let count = i.min(window) + 1;
        smoothed.push(SignalSample::new(sample.time, running_sum / count as f64));
    }

    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<SignalSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SignalSample::new(i as f64 * 0.1, *v))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(smooth_envelope(&[], 8).is_empty());
    }

    #[test]
    fn test_window_shrinks_at_start() {
        let input = series(&[-10.0, -30.0, -8.0, -30.0, -6.0]);
        let smoothed = smooth_envelope(&input, 1);
        let values: Vec<f64> = smoothed.iter().map(|s| s.value).collect();

        assert_eq!(values, vec![-10.0, -20.0, -19.0, -19.0, -18.0]);
        assert_eq!(smoothed[4].time, input[4].time);
    }

    #[test]
    fn test_zero_window_is_identity() {
        let input = series(&[-1.0, -2.0, -3.0]);
        assert_eq!(smooth_envelope(&input, 0), input);
    }

    #[test]
    fn test_matches_direct_mean() {
        let input = series(&[
            -12.0, -14.0, -9.0, -20.0, -11.0, -13.0, -16.0, -10.0, -9.5, -18.0, -22.0,
        ]);
        let window = 8;
        let smoothed = smooth_envelope(&input, window);

        for i in 0..input.len() {
            let start = i.saturating_sub(window);
            let slice = &input[start..=i];
            let mean = slice.iter().map(|s| s.value).sum::<f64>() / slice.len() as f64;
            assert!((smoothed[i].value - mean).abs() < 1e-9, "mismatch at {}", i);
        }
    }
}
