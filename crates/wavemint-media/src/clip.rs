//! Segment rendering into vertical mp4 clips.

use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use wavemint_models::{EncodingConfig, RenderTarget, Segment};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Encodes one segment of a source file into `output`.
#[async_trait]
pub trait ClipRenderer: Send + Sync {
    async fn render_segment(
        &self,
        media: &Path,
        segment: &Segment,
        output: &Path,
    ) -> MediaResult<()>;
}

/// [`ClipRenderer`] that trims, crops to the target frame and re-encodes.
#[derive(Debug, Clone, Default)]
pub struct FfmpegClipRenderer {
    encoding: EncodingConfig,
    target: RenderTarget,
    timeout_secs: Option<u64>,
}

impl FfmpegClipRenderer {
    pub fn new(encoding: EncodingConfig, target: RenderTarget) -> Self {
        Self {
            encoding,
            target,
            timeout_secs: None,
        }
    }

    /// Kill the encoder if a single render exceeds `secs`.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn build_command(&self, media: &Path, segment: &Segment, output: &Path) -> FfmpegCommand {
        FfmpegCommand::new(media, output)
            .seek(segment.start)
            .duration(segment.duration())
            .video_filter(self.target.crop_scale_filter())
            .output_args(self.encoding.to_ffmpeg_args())
            .output_args(["-movflags", "+faststart"])
            .format("mp4")
    }

    fn runner(&self) -> FfmpegRunner {
        match self.timeout_secs {
            Some(secs) => FfmpegRunner::new().with_timeout(secs),
            None => FfmpegRunner::new(),
        }
    }
}

#[async_trait]
impl ClipRenderer for FfmpegClipRenderer {
    async fn render_segment(
        &self,
        media: &Path,
        segment: &Segment,
        output: &Path,
    ) -> MediaResult<()> {
        if !media.exists() {
            return Err(MediaError::FileNotFound(media.to_path_buf()));
        }
        if !(segment.duration() > 0.0) {
            return Err(MediaError::internal(format!(
                "Cannot render empty segment {:.3}-{:.3}",
                segment.start, segment.end
            )));
        }

        info!(
            "Rendering clip: {} -> {} ({:.2}s-{:.2}s)",
            media.display(),
            output.display(),
            segment.start,
            segment.end
        );

        let cmd = self.build_command(media, segment, output);
        let clip_secs = segment.duration();
        self.runner()
            .run_with_progress(&cmd, move |progress| {
                debug!(
                    percent = progress.percentage(clip_secs),
                    speed = progress.speed,
                    "Render progress"
                );
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command() {
        let renderer = FfmpegClipRenderer::default();
        let args = renderer
            .build_command(
                Path::new("in.mp4"),
                &Segment::new(6.5, 18.0),
                Path::new("/tmp/out_1.mp4"),
            )
            .build_args();
        let joined = args.join(" ");

        assert!(joined.contains("-ss 6.500 -t 11.500 -i in.mp4"));
        assert!(joined.contains("scale=1080:1920"));
        assert!(joined.contains("-c:v libx264"));
        assert!(joined.contains("-c:a aac"));
        assert!(joined.contains("-f mp4"));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out_1.mp4"));
    }

    #[test]
    fn test_custom_codecs_and_target() {
        let renderer = FfmpegClipRenderer::new(
            EncodingConfig::default().with_codecs("libx265", "libopus"),
            RenderTarget::new(720, 1280),
        );
        let joined = renderer
            .build_command(Path::new("in.mp4"), &Segment::new(0.0, 7.0), Path::new("out.mp4"))
            .build_args()
            .join(" ");

        assert!(joined.contains("-c:v libx265"));
        assert!(joined.contains("-c:a libopus"));
        assert!(joined.contains("scale=720:1280"));
    }

    #[tokio::test]
    async fn test_missing_source_rejected() {
        let err = FfmpegClipRenderer::default()
            .render_segment(
                Path::new("/nonexistent.mp4"),
                &Segment::new(0.0, 6.0),
                Path::new("out.mp4"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
