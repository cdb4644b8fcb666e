//! State machine turning a `silencedetect` report into paired intervals.
//!
//! # State Machine
//!
//! ```text
//!              Start(t)
//!     ┌──────────────────────┐
//!     │                      ▼
//! ┌──────┐   End(t1)   ┌───────────┐
//! │ Idle │◄────────────│ InSilence │──┐ Start(t') replaces
//! └──────┘  emit pair  └───────────┘◄─┘ the open start
//! ```
//!
//! An `End` seen while `Idle` is ignored, and a `Start` still open when the
//! report ends is dropped.

use wavemint_models::SilenceInterval;

const START_MARKER: &str = "silence_start:";
const END_MARKER: &str = "silence_end:";

/// One event recognised in a silence report line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SilenceEvent {
    Start(f64),
    End(f64),
}

impl SilenceEvent {
    /// Recognise a report line.
    ///
    /// Lines look like `[silencedetect @ 0x..] silence_start: 1.5` and
    /// `[silencedetect @ 0x..] silence_end: 2.5 | silence_duration: 1`.
    /// Anything else, including markers with an unparsable number, is `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        if let Some(value) = marker_value(line, START_MARKER) {
            return Some(Self::Start(value));
        }
        marker_value(line, END_MARKER).map(Self::End)
    }
}

fn marker_value(line: &str, marker: &str) -> Option<f64> {
    let (_, rest) = line.split_once(marker)?;
    let field = rest.split('|').next()?;
    let value = field.split_whitespace().next()?.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    InSilence { start: f64 },
}

/// Pairs start/end events into [`SilenceInterval`]s in report order.
#[derive(Debug)]
pub struct SilenceTracker {
    state: State,
    intervals: Vec<SilenceInterval>,
}

impl Default for SilenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SilenceTracker {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            intervals: Vec::new(),
        }
    }

    /// Feed one event.
    pub fn ingest(&mut self, event: SilenceEvent) {
        match (self.state, event) {
            (_, SilenceEvent::Start(start)) => {
                self.state = State::InSilence { start };
            }
            (State::InSilence { start }, SilenceEvent::End(end)) => {
                // end < start yields None and is dropped
                if let Some(interval) = SilenceInterval::new(start, end) {
                    self.intervals.push(interval);
                }
                self.state = State::Idle;
            }
            (State::Idle, SilenceEvent::End(_)) => {}
        }
    }

    /// Close the tracker, discarding any unmatched start.
    pub fn finish(self) -> Vec<SilenceInterval> {
        self.intervals
    }
}

/// Parse a full report into paired intervals, unsorted and unmerged.
pub fn parse_silence_report(report: &str) -> Vec<SilenceInterval> {
    let mut tracker = SilenceTracker::new();
    for event in report.lines().filter_map(SilenceEvent::parse_line) {
        tracker.ingest(event);
    }
    tracker.finish()
}
