use std::io;
use thiserror::Error;

/// Engine-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected before entering the pipeline (e.g., empty or whitespace-only text).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Tabular input does not carry the required text field.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Too many items or rows were submitted in a single call.
    #[error("Limit exceeded: {actual} items submitted, maximum is {limit}")]
    LimitExceeded { limit: usize, actual: usize },

    /// The ML sentiment backend could not be initialized or failed to score.
    /// Never surfaced to callers: the engine falls back to rule-based scoring.
    #[error("Sentiment backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Represents configuration-related errors (e.g., out-of-range thresholds).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl AppError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Schema(_) => "schema_error",
            AppError::LimitExceeded { .. } => "limit_exceeded_error",
            AppError::BackendUnavailable(_) => "backend_unavailable_error",
            AppError::Config(_) => "config_error",
            AppError::Timeout(_) => "timeout_error",
            AppError::Internal(_) => "internal_error",
            AppError::Io(_) => "io_error",
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Schema(s) => AppError::Schema(s.clone()),
            AppError::LimitExceeded { limit, actual } => AppError::LimitExceeded {
                limit: *limit,
                actual: *actual,
            },
            AppError::BackendUnavailable(s) => AppError::BackendUnavailable(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Timeout(s) => AppError::Timeout(s.clone()),
            AppError::Internal(s) => AppError::Internal(s.clone()),
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Item analysis timed out: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Analysis task failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Config(format!("Invalid lexicon pattern: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Config(format!("Invalid analyzer configuration: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_message_names_the_limit() {
        let err = AppError::LimitExceeded {
            limit: 50,
            actual: 51,
        };
        assert!(err.to_string().contains("maximum is 50"));
        assert_eq!(err.kind(), "limit_exceeded_error");
    }

    #[test]
    fn test_clone_preserves_variant() {
        let err = AppError::Io(io::Error::new(io::ErrorKind::NotFound, "missing"));
        match err.clone() {
            AppError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected variant {:?}", other),
        }
    }
}
