#![deny(unreachable_patterns)]
//! Audio-driven phrase slicing on top of the FFmpeg CLI.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and a runner with timeouts
//! - Engine adapters for level series, silence reports, probing and rendering
//! - Feature extraction (envelope, peaks, tempo, beat grid, energy spikes)
//! - Silence map parsing and merging
//! - Phrase segmentation over beats, silences and energy spikes
//! - A per-run render arena with guaranteed artifact cleanup

pub mod arena;
pub mod clip;
pub mod command;
pub mod error;
pub mod features;
pub mod phrase;
pub mod probe;
pub mod progress;
pub mod signal;
pub mod silence;

pub use arena::{ArtifactGuard, RenderArena};
pub use clip::{ClipRenderer, FfmpegClipRenderer};
pub use command::{create_ffmpeg_command, create_ffprobe_command, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use features::{extract_features, AnalysisEngines, BeatAnalysis, FeatureMaps};
pub use phrase::{segment_phrases, SegmentationPlan};
pub use probe::{probe_media, FfprobeProbe, MediaInfo, MediaProbe};
pub use progress::RenderProgress;
pub use signal::{FfprobeSignalSource, SignalSource};
pub use silence::{FfmpegSilenceReporter, SilenceReporter};
