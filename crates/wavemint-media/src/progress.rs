//! FFmpeg `-progress` parsing for clip renders.

use serde::{Deserialize, Serialize};

/// Progress of one encoder process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderProgress {
    /// Output time in milliseconds
    pub out_time_ms: i64,
    /// Encoding speed (e.g., 1.5 = 1.5x realtime)
    pub speed: f64,
    /// Whether encoding is complete
    pub is_complete: bool,
}

impl RenderProgress {
    /// Progress percentage given the clip duration in seconds.
    pub fn percentage(&self, clip_duration_secs: f64) -> f64 {
        if clip_duration_secs <= 0.0 {
            return 0.0;
        }
        let done_secs = self.out_time_ms as f64 / 1000.0;
        (done_secs / clip_duration_secs * 100.0).clamp(0.0, 100.0)
    }
}

/// Fold one `key=value` line into `current`.
///
/// Returns a snapshot at the end of each progress block.
pub(crate) fn parse_progress_line(
    line: &str,
    current: &mut RenderProgress,
) -> Option<RenderProgress> {
    let (key, value) = line.trim().split_once('=')?;

    match key {
        // FFmpeg reports microseconds under both keys
        "out_time_us" | "out_time_ms" => {
            if let Ok(us) = value.parse::<i64>() {
                current.out_time_ms = us / 1000;
            }
        }
        "speed" => {
            if let Some(speed) = value.strip_suffix('x').and_then(|s| s.trim().parse().ok()) {
                current.speed = speed;
            }
        }
        "progress" => {
            current.is_complete = value == "end";
            return Some(current.clone());
        }
        _ => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_parsing() {
        let mut progress = RenderProgress::default();

        assert!(parse_progress_line("out_time_us=5000000", &mut progress).is_none());
        assert_eq!(progress.out_time_ms, 5000);

        parse_progress_line("speed=1.5x", &mut progress);
        assert!((progress.speed - 1.5).abs() < 0.01);

        parse_progress_line("speed=N/A", &mut progress);
        assert!((progress.speed - 1.5).abs() < 0.01);

        let snapshot = parse_progress_line("progress=end", &mut progress).unwrap();
        assert!(snapshot.is_complete);
    }

    #[test]
    fn test_ignores_log_lines() {
        let mut progress = RenderProgress::default();
        assert!(parse_progress_line("[libx264 @ 0x55] frame I:1", &mut progress).is_none());
    }

    #[test]
    fn test_percentage() {
        let progress = RenderProgress {
            out_time_ms: 3000,
            ..Default::default()
        };
        assert!((progress.percentage(6.0) - 50.0).abs() < 0.01);
        assert!((progress.percentage(2.0) - 100.0).abs() < 0.01);
        assert_eq!(progress.percentage(0.0), 0.0);
    }
}
