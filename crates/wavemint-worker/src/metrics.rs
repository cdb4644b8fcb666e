//! Prometheus metrics for slicing runs.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use wavemint_models::SegmentationStrategy;

use crate::error::{WorkerError, WorkerResult};

/// Metric names as constants for consistency.
pub mod names {
    pub const RUNS_STARTED_TOTAL: &str = "wavemint_runs_started_total";
    pub const RUNS_COMPLETED_TOTAL: &str = "wavemint_runs_completed_total";
    pub const RUNS_FAILED_TOTAL: &str = "wavemint_runs_failed_total";
    pub const SEGMENTS_TOTAL: &str = "wavemint_segments_total";
    pub const RENDER_DURATION_SECONDS: &str = "wavemint_render_duration_seconds";
    pub const RENDER_FAILURES_TOTAL: &str = "wavemint_render_failures_total";
    pub const RUN_DURATION_SECONDS: &str = "wavemint_run_duration_seconds";
}

/// Serve a Prometheus scrape endpoint on `0.0.0.0:<port>`.
///
/// Must be called from inside a tokio runtime.
pub fn init_metrics(port: u16) -> WorkerResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| {
            WorkerError::config_error(format!("Failed to install Prometheus exporter: {}", e))
        })
}

pub fn record_run_started() {
    counter!(names::RUNS_STARTED_TOTAL).increment(1);
}

pub fn record_run_completed(duration_secs: f64) {
    counter!(names::RUNS_COMPLETED_TOTAL).increment(1);
    histogram!(names::RUN_DURATION_SECONDS).record(duration_secs);
}

pub fn record_run_failed(error: &WorkerError) {
    let labels = [("kind", error.kind().to_string())];
    counter!(names::RUNS_FAILED_TOTAL, &labels).increment(1);
}

pub fn record_segments(strategy: SegmentationStrategy, count: usize) {
    let labels = [("strategy", strategy.as_str().to_string())];
    counter!(names::SEGMENTS_TOTAL, &labels).increment(count as u64);
}

pub fn record_render(duration_secs: f64) {
    histogram!(names::RENDER_DURATION_SECONDS).record(duration_secs);
}

pub fn record_render_failure(timed_out: bool) {
    let labels = [("timeout", timed_out.to_string())];
    counter!(names::RENDER_FAILURES_TOTAL, &labels).increment(1);
}
