// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Paper source unavailable for topic '{topic}': {message}")]
    SourceUnavailable { topic: String, message: String },

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Failed to persist seen cache to {path}: {source}")]
    CachePersist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load seen cache from {path}: {source}")]
    CacheLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn source_unavailable(topic: &str, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            topic: topic.to_string(),
            message: message.into(),
        }
    }

    /// Errors that end the process with a non-zero exit. Per-topic, per-paper
    /// and notification failures are recovered inside a run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::CachePersist { .. } | Self::CacheLoad { .. } | Self::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let persist = PipelineError::CachePersist {
            path: PathBuf::from("/nope/seen.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(persist.is_fatal());
        assert!(!PipelineError::source_unavailable("llm", "timeout").is_fatal());
        assert!(!PipelineError::Inference("down".to_string()).is_fatal());
        assert!(!PipelineError::Notification("auth".to_string()).is_fatal());
    }

    #[test]
    fn test_source_unavailable_message() {
        let err = PipelineError::source_unavailable("text to table", "HTTP 503");
        assert_eq!(
            err.to_string(),
            "Paper source unavailable for topic 'text to table': HTTP 503"
        );
    }
}
