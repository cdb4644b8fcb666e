//! Energy spikes from a min-max normalised peak-level series.

use wavemint_models::{EnergySpike, SignalSample};

use super::peaks::local_maxima;

/// Keeps the normalisation finite on a flat series.
const NORMALIZE_EPSILON: f64 = 1e-6;

/// Detect spikes whose normalised level is a strict local maximum above `threshold`.
pub fn detect_energy_spikes(series: &[SignalSample], threshold: f64) -> Vec<EnergySpike> {
    if series.is_empty() {
        return Vec::new();
    }

    let (min, max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.value), hi.max(s.value))
        });
    let range = max - min + NORMALIZE_EPSILON;

    let normalized: Vec<EnergySpike> = series
        .iter()
        .map(|s| EnergySpike {
            time: s.time,
            level: (s.value - min) / range,
        })
        .collect();

    local_maxima(&normalized, threshold, |s| s.level)
        .into_iter()
        .map(|i| normalized[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<SignalSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SignalSample::new(i as f64, *v))
            .collect()
    }

    #[test]
    fn test_empty_series() {
        assert!(detect_energy_spikes(&[], 0.45).is_empty());
    }

    #[test]
    fn test_flat_series_has_no_spikes() {
        assert!(detect_energy_spikes(&series(&[-6.0; 10]), 0.45).is_empty());
    }

    #[test]
    fn test_spikes_above_relative_threshold() {
        // Normalised: [0, 1, 0, 0.4, 0.2, 0.8, 0]
        let input = series(&[-40.0, -10.0, -40.0, -28.0, -34.0, -16.0, -40.0]);
        let spikes = detect_energy_spikes(&input, 0.45);

        let times: Vec<f64> = spikes.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![1.0, 5.0]);
        assert!(spikes.iter().all(|s| (0.0..=1.0).contains(&s.level)));
        assert!(spikes[0].level > spikes[1].level);
    }
}
