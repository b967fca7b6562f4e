//! Workflow error types.

use thiserror::Error;

use reelhire_client::ClientError;
use reelhire_media::MediaError;
use reelhire_models::EditParamsError;

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors produced while driving the upload/replace workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The backend explicitly reported job failure during polling.
    /// Terminal; the job handle is spent.
    #[error("upload job failed: {0}")]
    JobFailed(String),

    /// The poll ceiling was reached without a terminal status. The
    /// caller may retry from scratch; there is no partial resume.
    #[error("upload timed out after {attempts} poll attempts")]
    UploadTimeout { attempts: u32 },

    /// The backend answered with a well-formed payload that violates
    /// the operation's protocol (e.g. completed without a result).
    #[error("backend protocol violation: {0}")]
    Protocol(String),

    #[error("invalid edit parameters: {0}")]
    Params(#[from] EditParamsError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference store error: {0}")]
    Preferences(String),
}

impl WorkflowError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn preferences(msg: impl Into<String>) -> Self {
        Self::Preferences(msg.into())
    }

    /// Whether this failure only concerns the local engine, so the
    /// same edit can be dispatched server-side instead.
    pub fn local_fallback_available(&self) -> bool {
        matches!(self, WorkflowError::Media(e) if e.is_unavailable())
    }
}
