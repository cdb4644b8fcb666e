//! Audio feature extraction.
//!
//! Three independent pipelines run over the analysis track:
//!
//! ```text
//! RMS series  ──► smooth ──► peaks ──► tempo ──► beat grid
//! silence report ──► parse ──► merge ──────────► silence map
//! Peak series ──► normalise ──► local maxima ──► energy spikes
//! ```
//!
//! Each pipeline degrades to an empty map when the engine fails, so the
//! segmenter always receives something to work with.

mod beat_grid;
mod energy;
mod envelope;
mod peaks;
mod tempo;

pub use beat_grid::build_beat_grid;
pub use energy::detect_energy_spikes;
pub use envelope::smooth_envelope;
pub use peaks::detect_peaks;
pub use tempo::{estimate_bpm, DEFAULT_BPM, MAX_BPM, MIN_BPM};

use std::path::Path;
use tracing::{debug, warn};

use wavemint_models::{
    last_sample_time, AnalysisConfig, Beat, EnergySpike, SignalMetric, SignalSample,
    SilenceInterval,
};

use crate::probe::MediaProbe;
use crate::signal::{extract_series_or_empty, SignalSource};
use crate::silence::{detect_silence_or_empty, SilenceReporter};

/// Output of the RMS beat pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatAnalysis {
    pub bpm: u32,
    pub peaks: Vec<SignalSample>,
    pub grid: Vec<Beat>,
}

/// Run smoothing, peak picking, tempo estimation and grid building.
pub fn analyze_beats(rms: &[SignalSample], config: &AnalysisConfig) -> BeatAnalysis {
    let smoothed = smooth_envelope(rms, config.smoothing_window);
    let peaks = detect_peaks(&smoothed, config.peak_floor_db);
    let bpm = estimate_bpm(&peaks);
    let grid = build_beat_grid(&peaks, bpm);

    BeatAnalysis { bpm, peaks, grid }
}

/// Everything the segmenter needs, plus what the run needs to pick a duration.
#[derive(Debug, Clone, Default)]
pub struct FeatureMaps {
    pub bpm: u32,
    pub beats: Vec<Beat>,
    pub silences: Vec<SilenceInterval>,
    pub spikes: Vec<EnergySpike>,
    /// Duration reported by the probe, if probing succeeded
    pub probed_duration: Option<f64>,
    /// Latest timestamp seen in either extracted series
    pub latest_sample_time: Option<f64>,
}

impl FeatureMaps {
    /// The probed duration, or the latest sample time when probing failed.
    pub fn media_duration(&self) -> Option<f64> {
        self.probed_duration.or(self.latest_sample_time)
    }
}

/// The engine seams used by [`extract_features`].
#[derive(Clone, Copy)]
pub struct AnalysisEngines<'a> {
    pub signal: &'a dyn SignalSource,
    pub silence: &'a dyn SilenceReporter,
    pub probe: &'a dyn MediaProbe,
}

/// Run the duration probe and the three pipelines concurrently.
pub async fn extract_features(
    engines: AnalysisEngines<'_>,
    media: &Path,
    config: &AnalysisConfig,
) -> FeatureMaps {
    let beat_pipeline = async {
        let rms = extract_series_or_empty(engines.signal, media, SignalMetric::Rms).await;
        let latest = last_sample_time(&rms);
        (analyze_beats(&rms, config), latest)
    };

    let energy_pipeline = async {
        let peak = extract_series_or_empty(engines.signal, media, SignalMetric::Peak).await;
        let latest = last_sample_time(&peak);
        (detect_energy_spikes(&peak, config.energy_spike_threshold), latest)
    };

    let probe = async {
        match engines.probe.duration(media).await {
            Ok(duration) => Some(duration),
            Err(e) => {
                warn!(path = %media.display(), error = %e, "Duration probe failed");
                None
            }
        }
    };

    let (probed_duration, (beats, rms_latest), silences, (spikes, peak_latest)) = tokio::join!(
        probe,
        beat_pipeline,
        detect_silence_or_empty(engines.silence, media, config),
        energy_pipeline,
    );

    let latest_sample_time = match (rms_latest, peak_latest) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    debug!(
        bpm = beats.bpm,
        peaks = beats.peaks.len(),
        beats = beats.grid.len(),
        silences = silences.len(),
        spikes = spikes.len(),
        "Feature extraction complete"
    );

    FeatureMaps {
        bpm: beats.bpm,
        beats: beats.grid,
        silences,
        spikes,
        probed_duration,
        latest_sample_time,
    }
}
