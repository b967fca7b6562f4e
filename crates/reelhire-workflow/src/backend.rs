//! Upload backend seam.
//!
//! The orchestrator drives jobs through this trait so tests can
//! substitute a scripted backend for the HTTP client.

use async_trait::async_trait;

use reelhire_client::{ApiClient, ClientResult, UploadRequest, UploadStatusResponse};
use reelhire_models::{MediaPayload, UploadId};

/// The two backend operations the orchestrator depends on.
#[async_trait]
pub trait UploadBackend: Send + Sync {
    /// Begin an asynchronous ingestion job.
    async fn submit(
        &self,
        payload: &MediaPayload,
        request: &UploadRequest,
    ) -> ClientResult<UploadId>;

    /// Read the current status of a job.
    async fn status(&self, id: &UploadId) -> ClientResult<UploadStatusResponse>;
}

#[async_trait]
impl UploadBackend for ApiClient {
    async fn submit(
        &self,
        payload: &MediaPayload,
        request: &UploadRequest,
    ) -> ClientResult<UploadId> {
        self.upload_binary(payload, request).await
    }

    async fn status(&self, id: &UploadId) -> ClientResult<UploadStatusResponse> {
        self.poll_upload_status(id).await
    }
}
