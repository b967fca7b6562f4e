//! Client error types.

use thiserror::Error;

/// Result type for backend client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Fetch { status: u16, message: String },

    /// The request never produced a response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response did not match the operation's canonical schema.
    /// Nonconforming payloads are rejected, never coerced.
    #[error("response did not match expected schema: {0}")]
    Schema(String),

    /// The request was rejected locally before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Client configuration problem (bad base URL, missing env).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Create a fetch error from an HTTP status.
    pub fn fetch(status: u16, message: impl Into<String>) -> Self {
        Self::Fetch {
            status,
            message: message.into(),
        }
    }

    /// Create a schema violation error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Transport failures and server-side 5xx/429 responses are
    /// transient; schema violations and 4xx rejections are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport(_) => true,
            ClientError::Fetch { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
