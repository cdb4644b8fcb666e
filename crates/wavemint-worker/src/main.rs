//! Slicing worker binary.
//!
//! Usage: `wavemint-worker <video> [audio]`. Prints the response JSON on
//! stdout; on failure prints the error payload and exits non-zero.

use anyhow::Context;
use std::process::ExitCode;
use tracing::{error, info, warn};

use wavemint_models::{ErrorResponse, SliceResponse};
use wavemint_worker::{init_tracing, metrics, SliceProcessor, SliceRequest, WorkerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    if let Some(port) = std::env::var("METRICS_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
        match metrics::init_metrics(port) {
            Ok(()) => info!("Metrics exporter listening on port {}", port),
            Err(e) => warn!("Metrics disabled: {}", e),
        }
    }

    match run().await {
        Ok(response) => match serde_json::to_string(&response) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => fail(anyhow::Error::new(e).context("Failed to encode response")),
        },
        Err(e) => fail(e),
    }
}

async fn run() -> anyhow::Result<SliceResponse> {
    let mut args = std::env::args().skip(1);
    let video = args.next().context("usage: wavemint-worker <video> [audio]")?;

    let mut request = SliceRequest::new(video);
    if let Some(audio) = args.next() {
        request = request.with_audio(audio);
    }

    let config = WorkerConfig::from_env()?;
    info!("Worker config: {:?}", config);

    let processor = SliceProcessor::new(config);
    let response = processor.process(&request).await?;
    Ok(response)
}

fn fail(e: anyhow::Error) -> ExitCode {
    error!("Slicing failed: {:#}", e);
    let payload = ErrorResponse::processing_failed(format!("{:#}", e));
    match serde_json::to_string(&payload) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{{\"error\":\"processing_failed\"}}"),
    }
    ExitCode::FAILURE
}
