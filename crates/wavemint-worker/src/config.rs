//! Worker configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use wavemint_models::encoding::{
    DEFAULT_AUDIO_CODEC, DEFAULT_TARGET_HEIGHT, DEFAULT_TARGET_WIDTH, DEFAULT_VIDEO_CODEC,
};
use wavemint_models::{AnalysisConfig, EncodingConfig, RenderTarget};

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum concurrent FFmpeg render processes per run
    pub max_render_parallel: usize,
    /// Deadline for a single clip render
    pub render_timeout: Duration,
    /// Work directory for render arenas
    pub work_dir: PathBuf,
    /// Output frame size
    pub target: RenderTarget,
    /// Video/audio codec pair and quality settings
    pub encoding: EncodingConfig,
    /// Analysis and segmentation parameters
    pub analysis: AnalysisConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_render_parallel: 2,
            render_timeout: Duration::from_secs(600),
            work_dir: PathBuf::from("/tmp/wavemint"),
            target: RenderTarget::default(),
            encoding: EncodingConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    ///
    /// Unset or unparsable variables fall back to their defaults; the
    /// resulting analysis parameters must still pass validation.
    pub fn from_env() -> WorkerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> WorkerResult<Self> {
        let secs = |key: &str, default: f64| parse_or(&lookup, key, default);
        let defaults = AnalysisConfig::default();

        let analysis = AnalysisConfig {
            min_length: secs("WAVEMINT_MIN_CLIP_SECS", defaults.min_length),
            max_length: secs("WAVEMINT_MAX_CLIP_SECS", defaults.max_length),
            silence_threshold_db: secs(
                "WAVEMINT_SILENCE_THRESHOLD_DB",
                defaults.silence_threshold_db,
            ),
            silence_min_duration: secs("WAVEMINT_SILENCE_MIN_SECS", defaults.silence_min_duration),
            silence_merge_tolerance: defaults.silence_merge_tolerance,
            peak_floor_db: secs("WAVEMINT_PEAK_FLOOR_DB", defaults.peak_floor_db),
            energy_spike_threshold: secs(
                "WAVEMINT_ENERGY_THRESHOLD",
                defaults.energy_spike_threshold,
            ),
            smoothing_window: parse_or(
                &lookup,
                "WAVEMINT_SMOOTHING_WINDOW",
                defaults.smoothing_window,
            ),
        };
        analysis
            .validate()
            .map_err(|e| WorkerError::config_error(e.to_string()))?;

        let target = RenderTarget::new(
            parse_or(&lookup, "WORKER_TARGET_WIDTH", DEFAULT_TARGET_WIDTH),
            parse_or(&lookup, "WORKER_TARGET_HEIGHT", DEFAULT_TARGET_HEIGHT),
        );
        if target.width == 0 || target.height == 0 {
            return Err(WorkerError::config_error("Render target must be non-zero"));
        }

        let encoding = EncodingConfig::default().with_codecs(
            lookup("WORKER_VIDEO_CODEC").unwrap_or_else(|| DEFAULT_VIDEO_CODEC.to_string()),
            lookup("WORKER_AUDIO_CODEC").unwrap_or_else(|| DEFAULT_AUDIO_CODEC.to_string()),
        );

        Ok(Self {
            max_render_parallel: parse_or(&lookup, "WORKER_MAX_RENDER_PARALLEL", 2usize).max(1),
            render_timeout: Duration::from_secs(parse_or(
                &lookup,
                "WORKER_RENDER_TIMEOUT_SECS",
                600u64,
            )),
            work_dir: lookup("WORKER_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/tmp/wavemint")),
            target,
            encoding,
            analysis,
        })
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
