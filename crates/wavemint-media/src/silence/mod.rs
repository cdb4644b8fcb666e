//! Silence map: engine report, event parsing and interval merging.

mod detect;
mod merge;
mod parser;

pub use detect::{detect_silence_or_empty, FfmpegSilenceReporter, SilenceReporter};
pub use merge::merge_silences;
pub use parser::{parse_silence_report, SilenceEvent, SilenceTracker};
