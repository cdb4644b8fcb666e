//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Media has no usable duration")]
    EmptyMedia,

    #[error("Rendering clip {index} failed: {source}")]
    RenderFailed {
        index: usize,
        #[source]
        source: wavemint_media::MediaError,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Media error: {0}")]
    Media(#[from] wavemint_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn render_failed(index: usize, source: wavemint_media::MediaError) -> Self {
        Self::RenderFailed { index, source }
    }

    /// Whether the failure came from the encoder's own deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            WorkerError::RenderFailed { source, .. } | WorkerError::Media(source) => {
                source.is_timeout()
            }
            _ => false,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkerError::InvalidRequest(_) => "invalid_request",
            WorkerError::EmptyMedia => "empty_media",
            WorkerError::RenderFailed { .. } => "render_failed",
            WorkerError::ConfigError(_) => "config",
            WorkerError::Media(_) => "media",
            WorkerError::Io(_) => "io",
            WorkerError::Serialization(_) => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavemint_media::MediaError;

    #[test]
    fn test_render_failure_message() {
        let err = WorkerError::render_failed(3, MediaError::Timeout(600));
        assert_eq!(
            err.to_string(),
            "Rendering clip 3 failed: Operation timed out after 600 seconds"
        );
        assert!(err.is_timeout());
        assert_eq!(err.kind(), "render_failed");
    }

    #[test]
    fn test_non_timeout() {
        assert!(!WorkerError::EmptyMedia.is_timeout());
        assert!(!WorkerError::from(MediaError::Cancelled).is_timeout());
    }
}
