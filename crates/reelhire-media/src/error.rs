//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during local media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The local toolchain could not be initialized through any
    /// candidate strategy. Callers fall back to server-side
    /// processing; this is a degraded-mode signal, not a fatal state.
    #[error("local processing toolchain unavailable: {0}")]
    Unavailable(String),

    #[error("engine not initialized; call init() first")]
    NotInitialized,

    #[error("transform pipeline failed: {message}")]
    ProcessingFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("probe failed: {message}")]
    ProbeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("invalid video file: {0}")]
    InvalidVideo(String),

    #[error("invalid edit parameters: {0}")]
    InvalidParams(#[from] reelhire_models::EditParamsError),

    #[error("operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create an unavailable-toolchain error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Create a pipeline failure error.
    pub fn processing_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::ProcessingFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a probe failure error.
    pub fn probe_failed(message: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ProbeFailed {
            message: message.into(),
            stderr,
        }
    }

    /// Whether this error means local processing is unavailable and a
    /// remote fallback should be attempted.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, MediaError::Unavailable(_) | MediaError::NotInitialized)
    }
}
