//! Silence reports from FFmpeg's `silencedetect` filter.

use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, warn};

use wavemint_models::{AnalysisConfig, SilenceInterval};

use super::merge::merge_silences;
use super::parser::parse_silence_report;
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Produces the raw silence report text for a media file.
#[async_trait]
pub trait SilenceReporter: Send + Sync {
    async fn silence_report(
        &self,
        media: &Path,
        threshold_db: f64,
        min_duration: f64,
    ) -> MediaResult<String>;
}

/// [`SilenceReporter`] running `ffmpeg -af silencedetect -f null -`.
#[derive(Debug, Clone, Default)]
pub struct FfmpegSilenceReporter {
    runner: FfmpegRunner,
}

impl FfmpegSilenceReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.runner = self.runner.with_timeout(secs);
        self
    }

    pub fn build_command(media: &Path, threshold_db: f64, min_duration: f64) -> FfmpegCommand {
        FfmpegCommand::analysis(media)
            .audio_filter(silencedetect_filter(threshold_db, min_duration))
    }
}

fn silencedetect_filter(threshold_db: f64, min_duration: f64) -> String {
    format!("silencedetect=n={}dB:d={}", threshold_db, min_duration)
}

#[async_trait]
impl SilenceReporter for FfmpegSilenceReporter {
    async fn silence_report(
        &self,
        media: &Path,
        threshold_db: f64,
        min_duration: f64,
    ) -> MediaResult<String> {
        if !media.exists() {
            return Err(MediaError::FileNotFound(media.to_path_buf()));
        }

        let cmd = Self::build_command(media, threshold_db, min_duration);
        self.runner.run_capture_stderr(&cmd).await
    }
}

/// Detect, parse and merge silences, degrading engine failure to an empty map.
pub async fn detect_silence_or_empty(
    reporter: &dyn SilenceReporter,
    media: &Path,
    config: &AnalysisConfig,
) -> Vec<SilenceInterval> {
    match reporter
        .silence_report(media, config.silence_threshold_db, config.silence_min_duration)
        .await
    {
        Ok(report) => {
            let silences = merge_silences(
                parse_silence_report(&report),
                config.silence_merge_tolerance,
            );
            debug!(intervals = silences.len(), "Detected silence");
            silences
        }
        Err(e) => {
            warn!(
                path = %media.display(),
                error = %e,
                "Silence detection failed, continuing without silence map"
            );
            metrics::counter!("wavemint_soft_extraction_failures_total", "stage" => "silence")
                .increment(1);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedReporter(MediaResult<String>);

    #[async_trait]
    impl SilenceReporter for CannedReporter {
        async fn silence_report(&self, _media: &Path, _db: f64, _min: f64) -> MediaResult<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(MediaError::ffmpeg_failed("boom", None, Some(1))),
            }
        }
    }

    #[test]
    fn test_build_command() {
        let args = FfmpegSilenceReporter::build_command(Path::new("/tmp/in.mp4"), -35.0, 0.4)
            .build_args();
        let joined = args.join(" ");

        assert!(joined.contains("-i /tmp/in.mp4"));
        assert!(joined.contains("-af silencedetect=n=-35dB:d=0.4"));
        assert!(joined.contains("-f null"));
        assert_eq!(args.last().map(String::as_str), Some("-"));
    }

    #[tokio::test]
    async fn test_report_is_parsed_and_merged() {
        let reporter = CannedReporter(Ok("\
[silencedetect @ 0x1] silence_start: 1
[silencedetect @ 0x1] silence_end: 2 | silence_duration: 1
[silencedetect @ 0x1] silence_start: 2.05
[silencedetect @ 0x1] silence_end: 3 | silence_duration: 0.95
"
        .to_string()));

        let config = AnalysisConfig::default();
        let silences = detect_silence_or_empty(&reporter, Path::new("in.mp4"), &config).await;
        assert_eq!(silences, vec![SilenceInterval::new(1.0, 3.0).unwrap()]);
    }

    #[tokio::test]
    async fn test_engine_failure_yields_empty_map() {
        let reporter = CannedReporter(Err(MediaError::internal("unused")));
        let config = AnalysisConfig::default();
        let silences = detect_silence_or_empty(&reporter, Path::new("in.mp4"), &config).await;
        assert!(silences.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = tokio_test::block_on(FfmpegSilenceReporter::new().silence_report(
            Path::new("/nonexistent/in.mp4"),
            -35.0,
            0.4,
        ));
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }
}
