//! Slicing run orchestration.
//!
//! One run: extract features from the analysis track, segment, render every
//! segment of the video under a bounded semaphore, and collect the encoded
//! clips. Rendering is all-or-nothing; the first failed segment aborts the
//! run and every artifact written so far is deleted with the arena.

use base64::prelude::{Engine as _, BASE64_STANDARD};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn, Instrument};

use wavemint_media::{
    extract_features, segment_phrases, AnalysisEngines, ClipRenderer, FfmpegClipRenderer,
    FfmpegSilenceReporter, FfprobeProbe, FfprobeSignalSource, MediaError, MediaProbe, RenderArena,
    SignalSource, SilenceReporter,
};
use wavemint_models::{JobId, RenderedClip, Segment, SliceResponse};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::metrics;

/// Input of one run.
#[derive(Debug, Clone)]
pub struct SliceRequest {
    /// Video to cut and render
    pub video: PathBuf,
    /// Optional separate track used for analysis instead of the video's audio
    pub audio: Option<PathBuf>,
}

impl SliceRequest {
    pub fn new(video: impl Into<PathBuf>) -> Self {
        Self {
            video: video.into(),
            audio: None,
        }
    }

    pub fn with_audio(mut self, audio: impl Into<PathBuf>) -> Self {
        self.audio = Some(audio.into());
        self
    }

    /// The file whose audio drives the analysis.
    pub fn analysis_source(&self) -> &Path {
        self.audio.as_deref().unwrap_or(&self.video)
    }

    fn validate(&self) -> WorkerResult<()> {
        if self.video.as_os_str().is_empty() {
            return Err(WorkerError::invalid_request("No video path given"));
        }
        if !self.video.is_file() {
            return Err(WorkerError::invalid_request(format!(
                "Video not found: {}",
                self.video.display()
            )));
        }
        if let Some(audio) = &self.audio {
            if !audio.is_file() {
                return Err(WorkerError::invalid_request(format!(
                    "Audio track not found: {}",
                    audio.display()
                )));
            }
        }
        Ok(())
    }
}

/// Runs slicing requests against a set of engine adapters.
pub struct SliceProcessor {
    config: WorkerConfig,
    signal: Arc<dyn SignalSource>,
    silence: Arc<dyn SilenceReporter>,
    probe: Arc<dyn MediaProbe>,
    renderer: Arc<dyn ClipRenderer>,
    render_semaphore: Arc<Semaphore>,
}

impl SliceProcessor {
    /// Processor backed by the FFmpeg/FFprobe CLI.
    pub fn new(config: WorkerConfig) -> Self {
        let renderer = FfmpegClipRenderer::new(config.encoding.clone(), config.target)
            .with_timeout(config.render_timeout.as_secs());

        Self::with_engines(
            config,
            Arc::new(FfprobeSignalSource::new()),
            Arc::new(FfmpegSilenceReporter::new()),
            Arc::new(FfprobeProbe::new()),
            Arc::new(renderer),
        )
    }

    pub fn with_engines(
        config: WorkerConfig,
        signal: Arc<dyn SignalSource>,
        silence: Arc<dyn SilenceReporter>,
        probe: Arc<dyn MediaProbe>,
        renderer: Arc<dyn ClipRenderer>,
    ) -> Self {
        let render_semaphore = Arc::new(Semaphore::new(config.max_render_parallel.max(1)));
        Self {
            config,
            signal,
            silence,
            probe,
            renderer,
            render_semaphore,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Run a request under a fresh job ID.
    pub async fn process(&self, request: &SliceRequest) -> WorkerResult<SliceResponse> {
        self.process_job(&JobId::new(), request).await
    }

    /// Run a request, recording run metrics and lifecycle logs.
    pub async fn process_job(
        &self,
        job_id: &JobId,
        request: &SliceRequest,
    ) -> WorkerResult<SliceResponse> {
        let logger = JobLogger::new(job_id, "slice");
        let span = logger.create_span();

        async {
            metrics::record_run_started();
            logger.log_start(&format!("Slicing {}", request.video.display()));
            let started = Instant::now();

            match self.run(job_id, request, &logger).await {
                Ok(response) => {
                    metrics::record_run_completed(started.elapsed().as_secs_f64());
                    logger.log_completion(&format!(
                        "{} clips ({}, {} BPM)",
                        response.clips.len(),
                        response.strategy,
                        response.bpm
                    ));
                    Ok(response)
                }
                Err(e) => {
                    metrics::record_run_failed(&e);
                    logger.log_error(&e.to_string());
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        job_id: &JobId,
        request: &SliceRequest,
        logger: &JobLogger,
    ) -> WorkerResult<SliceResponse> {
        request.validate()?;

        let engines = AnalysisEngines {
            signal: self.signal.as_ref(),
            silence: self.silence.as_ref(),
            probe: self.probe.as_ref(),
        };
        let analysis = extract_features(engines, request.analysis_source(), &self.config.analysis);
        let (maps, video_duration) = tokio::join!(analysis, self.separate_video_duration(request));

        if maps.probed_duration.is_none() {
            logger.log_warning("Duration probe failed, using latest sample time");
        }
        let duration =
            clip_bound(maps.media_duration(), video_duration).ok_or(WorkerError::EmptyMedia)?;

        let plan = segment_phrases(
            &maps.beats,
            &maps.silences,
            &maps.spikes,
            &self.config.analysis,
            duration,
        );
        if plan.is_empty() {
            return Err(WorkerError::EmptyMedia);
        }

        metrics::record_segments(plan.strategy, plan.segments.len());
        logger.log_progress(&format!(
            "{} segments via {} over {:.2}s",
            plan.segments.len(),
            plan.strategy,
            duration
        ));

        let clips = self.render_all(job_id, &request.video, &plan.segments).await?;

        Ok(SliceResponse::success(job_id.clone(), maps.bpm, plan.strategy, clips))
    }

    /// Duration of the video when the analysis runs on a separate track.
    async fn separate_video_duration(&self, request: &SliceRequest) -> Option<f64> {
        request.audio.as_ref()?;
        match self.probe.duration(&request.video).await {
            Ok(duration) => Some(duration),
            Err(e) => {
                warn!(path = %request.video.display(), error = %e, "Video duration probe failed");
                None
            }
        }
    }

    /// Render every segment; the first failure cancels the rest.
    async fn render_all(
        &self,
        job_id: &JobId,
        media: &Path,
        segments: &[Segment],
    ) -> WorkerResult<Vec<RenderedClip>> {
        let arena = RenderArena::new(&self.config.work_dir, job_id)?;

        let renders = segments
            .iter()
            .enumerate()
            .map(|(index, segment)| self.render_one(&arena, media, index, segment));
        let clips = try_join_all(renders).await?;

        if let Err(e) = arena.close() {
            warn!(error = %e, "Failed to remove render arena");
        }
        Ok(clips)
    }

    async fn render_one(
        &self,
        arena: &RenderArena,
        media: &Path,
        index: usize,
        segment: &Segment,
    ) -> WorkerResult<RenderedClip> {
        let _permit = self
            .render_semaphore
            .acquire()
            .await
            .map_err(|_| WorkerError::render_failed(index, MediaError::Cancelled))?;

        let artifact = arena.allocate();
        debug!(
            segment_index = index,
            start = segment.start,
            end = segment.end,
            path = %artifact.path().display(),
            "Rendering segment"
        );

        let started = Instant::now();
        if let Err(e) = self.renderer.render_segment(media, segment, artifact.path()).await {
            metrics::record_render_failure(e.is_timeout());
            return Err(WorkerError::render_failed(index, e));
        }
        metrics::record_render(started.elapsed().as_secs_f64());

        let bytes = artifact
            .consume()
            .await
            .map_err(|e| WorkerError::render_failed(index, e))?;

        info!(segment_index = index, bytes = bytes.len(), "Rendered segment");
        Ok(RenderedClip::new(index, segment, BASE64_STANDARD.encode(bytes)))
    }
}

/// Segments must fit the analysed track and the video they are cut from.
fn clip_bound(analysis: Option<f64>, video: Option<f64>) -> Option<f64> {
    match (analysis, video) {
        (Some(a), Some(v)) => Some(a.min(v)),
        (a, v) => a.or(v),
    }
}
