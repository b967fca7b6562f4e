//! Canonical request/response schemas.
//!
//! Exactly one schema per backend operation. Responses that fail to
//! deserialize are schema errors at the boundary; the client never
//! guesses among alternative field names.

use serde::{Deserialize, Serialize};

use reelhire_models::{CatalogMetadata, EditParams, UploadId, UploadResult, UploadStatus};

/// Metadata accompanying an upload, including the optional
/// server-side transform to apply during ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Original file name
    pub file_name: String,
    /// Title for the temporary entry created by ingestion
    pub title: String,
    /// Server-side transform parameters, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<EditParams>,
}

/// Response to a new upload submission.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadCreated {
    /// Backend-issued job handle
    pub upload_id: UploadId,
}

/// One poll observation of an upload job.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadStatusResponse {
    /// Current status
    pub status: UploadStatus,
    /// Progress percentage (0-100)
    #[serde(default)]
    pub progress: u8,
    /// Result descriptor; present once the job completes
    #[serde(default)]
    pub result: Option<UploadResult>,
    /// Error message; present when the job failed
    #[serde(default)]
    pub error: Option<String>,
}

/// Request to repoint an entry at newly ingested media.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaceMediaRequest {
    /// Confirmed-live URL of the replacement asset
    pub new_url: String,
    /// Thumbnail of the replacement asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Updated entry metadata
    pub metadata: CatalogMetadata,
}

/// Response to a replace request. The backend archives the prior
/// version atomically on its side.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceMediaResponse {
    /// Whether a prior version existed and was archived
    pub archived_prior_version: bool,
}
