//! Per-frame audio level series extracted with FFprobe's `astats` filter.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tracing::{debug, warn};

use wavemint_models::{SignalMetric, SignalSample};

use crate::command::{check_ffprobe, create_ffprobe_command};
use crate::error::{MediaError, MediaResult};

/// Source of time-stamped scalar series for a media file's audio track.
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Extract the per-frame `metric` series, ordered by time.
    async fn scalar_series(
        &self,
        media: &Path,
        metric: SignalMetric,
    ) -> MediaResult<Vec<SignalSample>>;
}

/// Extract a series, degrading any engine failure to an empty series.
pub async fn extract_series_or_empty(
    source: &dyn SignalSource,
    media: &Path,
    metric: SignalMetric,
) -> Vec<SignalSample> {
    match source.scalar_series(media, metric).await {
        Ok(series) => {
            debug!(metric = %metric, samples = series.len(), "Extracted signal series");
            series
        }
        Err(e) => {
            warn!(
                metric = %metric,
                path = %media.display(),
                error = %e,
                "Signal extraction failed, continuing without it"
            );
            metrics::counter!("wavemint_soft_extraction_failures_total", "stage" => metric.as_str())
                .increment(1);
            Vec::new()
        }
    }
}

/// [`SignalSource`] backed by `ffprobe -f lavfi amovie=...,astats`.
#[derive(Debug, Clone, Default)]
pub struct FfprobeSignalSource;

impl FfprobeSignalSource {
    pub fn new() -> Self {
        Self
    }

    /// Arguments for one `astats` probe.
    pub fn build_args(media: &Path, metric: SignalMetric) -> Vec<String> {
        let graph = format!(
            "amovie={},astats=metadata=1:reset=1",
            escape_filtergraph(&escape_filter_value(&media.to_string_lossy()))
        );

        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            "lavfi".to_string(),
            "-i".to_string(),
            graph,
            "-show_entries".to_string(),
            format!("frame=pts_time:frame_tags={}", metric.astats_key()),
            "-of".to_string(),
            "csv=p=0".to_string(),
        ]
    }
}

#[async_trait]
impl SignalSource for FfprobeSignalSource {
    async fn scalar_series(
        &self,
        media: &Path,
        metric: SignalMetric,
    ) -> MediaResult<Vec<SignalSample>> {
        if !media.exists() {
            return Err(MediaError::FileNotFound(media.to_path_buf()));
        }

        check_ffprobe()?;

        let output = create_ffprobe_command()
            .args(Self::build_args(media, metric))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(MediaError::ffprobe_failed(
                format!("astats probe for {} failed", metric),
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        Ok(parse_series_csv(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `time,value` rows, skipping blank, partial and non-finite rows.
pub fn parse_series_csv(text: &str) -> Vec<SignalSample> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.trim().split(',');
            let time = fields.next()?.trim().parse::<f64>().ok()?;
            let value = fields.next()?.trim().parse::<f64>().ok()?;
            (time.is_finite() && value.is_finite()).then(|| SignalSample::new(time, value))
        })
        .collect()
}

/// Escape a filter option value (first escaping level).
fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '\'' | ':') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape a filter description inside a filtergraph (second escaping level).
fn escape_filtergraph(description: &str) -> String {
    let mut escaped = String::with_capacity(description.len());
    for c in description.chars() {
        if matches!(c, '\\' | '\'' | '[' | ']' | ',' | ';') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_series_csv() {
        let text = "0.000000,-20.5\n0.023220,-18.25\n\n0.046440\n\
                    0.069660,-inf\nN/A,-3\n0.092880,-17.0,\n";
        let series = parse_series_csv(text);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0], SignalSample::new(0.0, -20.5));
        assert_eq!(series[1], SignalSample::new(0.02322, -18.25));
        assert_eq!(series[2], SignalSample::new(0.09288, -17.0));
    }

    #[test]
    fn test_build_args_selects_metric_key() {
        let args = FfprobeSignalSource::build_args(Path::new("/tmp/in.mp4"), SignalMetric::Peak);
        assert!(args.contains(&"amovie=/tmp/in.mp4,astats=metadata=1:reset=1".to_string()));
        let entries = "frame=pts_time:frame_tags=lavfi.astats.Overall.Peak_level";
        assert!(args.contains(&entries.to_string()));
    }

    #[test]
    fn test_escaping_special_characters() {
        assert_eq!(escape_filtergraph(&escape_filter_value("/tmp/a,b.mp4")), "/tmp/a\\,b.mp4");
        assert_eq!(escape_filtergraph(&escape_filter_value("C:clip")), "C\\\\:clip");
        assert_eq!(escape_filtergraph(&escape_filter_value("it's")), "it\\\\\\'s");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let err = FfprobeSignalSource::new()
            .scalar_series(Path::new("/nonexistent/clip.mp4"), SignalMetric::Rms)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
