//! Slicing worker.
//!
//! This crate provides:
//! - The run orchestrator (`SliceProcessor`)
//! - Environment-driven configuration
//! - Structured job logging and tracing setup
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod processor;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::{init_tracing, JobLogger};
pub use processor::{SliceProcessor, SliceRequest};
