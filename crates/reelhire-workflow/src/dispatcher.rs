//! Remote transform dispatch.
//!
//! Packages a source payload plus the full edit parameter set into a
//! single submission for server-side processing. Supports the
//! superset of the local engine's parameters, including the
//! Premium-only overlay and audio-mix attachments the local engine
//! degrades. Returns the job descriptor; driving it to completion is
//! the orchestrator's job.

use tracing::info;

use reelhire_client::UploadRequest;
use reelhire_models::{EditParams, MediaPayload, UploadJob};

use crate::backend::UploadBackend;
use crate::error::WorkflowResult;

/// Dispatches transforms to the backend's encoder.
#[derive(Debug, Clone)]
pub struct RemoteDispatcher<B> {
    backend: B,
}

impl<B: UploadBackend> RemoteDispatcher<B> {
    /// Create a dispatcher over a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Submit a payload with its transform parameters.
    ///
    /// Parameters are validated and snapshotted into the request;
    /// edits made after dispatch never affect the in-flight job.
    pub async fn dispatch(
        &self,
        payload: &MediaPayload,
        file_name: impl Into<String>,
        title: impl Into<String>,
        params: &EditParams,
    ) -> WorkflowResult<UploadJob> {
        params.validate(None)?;

        let request = UploadRequest {
            file_name: file_name.into(),
            title: title.into(),
            transform: Some(params.clone()),
        };

        let id = self.backend.submit(payload, &request).await?;
        info!(upload_id = %id, "transform dispatched for server-side processing");
        Ok(UploadJob::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use reelhire_client::{ClientResult, UploadStatusResponse};
    use reelhire_models::{Segment, UploadId, UploadStatus};

    /// Backend that records the submitted request.
    #[derive(Default)]
    struct RecordingBackend {
        submitted: Mutex<Option<UploadRequest>>,
    }

    #[async_trait]
    impl UploadBackend for &RecordingBackend {
        async fn submit(
            &self,
            _payload: &MediaPayload,
            request: &UploadRequest,
        ) -> ClientResult<UploadId> {
            *self.submitted.lock().unwrap() = Some(request.clone());
            Ok(UploadId::from("up-7"))
        }

        async fn status(&self, _id: &UploadId) -> ClientResult<UploadStatusResponse> {
            unreachable!("dispatcher never polls")
        }
    }

    #[tokio::test]
    async fn test_dispatch_packages_full_parameter_set() {
        let backend = RecordingBackend::default();
        let dispatcher = RemoteDispatcher::new(&backend);

        let mut params = EditParams::trimmed(0.0, 30.0);
        params.segments = vec![
            Segment::new(2.0, 8.0).unwrap(),
            Segment::new(12.0, 18.0).unwrap(),
        ];

        let job = dispatcher
            .dispatch(&MediaPayload::mp4(vec![0; 16]), "clip.mp4", "Intro reel", &params)
            .await
            .unwrap();

        assert_eq!(job.id, UploadId::from("up-7"));
        assert_eq!(job.status, UploadStatus::Pending);

        let submitted = backend.submitted.lock().unwrap().clone().unwrap();
        let transform = submitted.transform.unwrap();
        assert_eq!(transform.segments.len(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_rejects_invalid_parameters() {
        let backend = RecordingBackend::default();
        let dispatcher = RemoteDispatcher::new(&backend);

        let params = EditParams::trimmed(20.0, 5.0);
        let result = dispatcher
            .dispatch(&MediaPayload::mp4(vec![0; 16]), "clip.mp4", "Intro reel", &params)
            .await;

        assert!(result.is_err());
        assert!(backend.submitted.lock().unwrap().is_none());
    }
}
