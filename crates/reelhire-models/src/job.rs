//! Upload job models and status lifecycle.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::EntryId;

/// Opaque upload job identifier issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct UploadId(pub String);

impl UploadId {
    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UploadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UploadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Upload job status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Job accepted, waiting for an encoder
    #[default]
    Pending,
    /// Job is actively being encoded
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed with an error
    Failed,
}

impl UploadStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Processing => "processing",
            UploadStatus::Completed => "completed",
            UploadStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more polls expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Failed)
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result descriptor returned when an upload job completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UploadResult {
    /// Confirmed-live URL of the ingested asset
    pub url: String,
    /// Asset duration in seconds
    pub duration_secs: f64,
    /// Asset size in bytes
    pub size_bytes: u64,
    /// Thumbnail URL, when the backend rendered one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// The temporary catalog entry created by the upload path; the
    /// replace coordinator deletes it after repointing the real entry
    pub entry_id: EntryId,
}

/// Client-side view of one asynchronous upload job.
///
/// Created on dispatch, updated from poll responses, discarded once a
/// terminal status is observed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UploadJob {
    /// Backend-issued job id
    pub id: UploadId,
    /// Last observed status
    pub status: UploadStatus,
    /// Last observed progress percentage (0-100)
    pub progress: u8,
    /// Error message when the backend reported failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl UploadJob {
    /// Create a new job view in the pending state.
    pub fn new(id: UploadId) -> Self {
        Self {
            id,
            status: UploadStatus::Pending,
            progress: 0,
            error_message: None,
        }
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Record an observed status.
    pub fn set_status(&mut self, status: UploadStatus) {
        self.status = status;
    }

    /// Record observed progress, clamped to 100.
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
    }

    /// Mark the job failed with the backend's error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = UploadStatus::Failed;
        self.error_message = Some(error.into());
    }
}
