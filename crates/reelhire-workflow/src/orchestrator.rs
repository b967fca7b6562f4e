//! Upload/poll orchestration.
//!
//! Drives one asynchronous backend job from submission to a terminal
//! state: `submitted → polling → {completed | failed | timed_out}`.
//! Polling is a fixed-interval loop bounded by an attempt ceiling;
//! the ceiling is the only cancellation mechanism an in-flight job
//! has.

use tracing::{debug, info, warn};

use reelhire_client::{UploadRequest, UploadStatusResponse};
use reelhire_models::{MediaPayload, UploadJob, UploadResult, UploadStatus};

use crate::backend::UploadBackend;
use crate::config::WorkflowConfig;
use crate::error::{WorkflowError, WorkflowResult};

/// Drives upload jobs to completion against an injectable backend.
#[derive(Debug, Clone)]
pub struct UploadOrchestrator<B> {
    backend: B,
    poll_interval: std::time::Duration,
    max_attempts: u32,
}

impl<B: UploadBackend> UploadOrchestrator<B> {
    /// Create an orchestrator with the configured polling policy.
    pub fn new(backend: B, config: &WorkflowConfig) -> Self {
        Self {
            backend,
            poll_interval: config.poll_interval,
            max_attempts: config.max_poll_attempts,
        }
    }

    /// Submit a payload and drive the resulting job to completion.
    pub async fn run<F>(
        &self,
        payload: &MediaPayload,
        request: &UploadRequest,
        on_progress: F,
    ) -> WorkflowResult<UploadResult>
    where
        F: FnMut(&UploadJob),
    {
        let id = self.backend.submit(payload, request).await?;
        info!(upload_id = %id, "upload submitted, polling");
        self.drive(UploadJob::new(id), on_progress).await
    }

    /// Drive an already-submitted job to a terminal state.
    ///
    /// Consumes the job handle: once this returns, the job must not
    /// be polled again. Transient poll errors are swallowed and the
    /// loop continues; each swallowed error still consumes an
    /// attempt, so a dead network terminates at the ceiling instead
    /// of hanging.
    pub async fn drive<F>(&self, mut job: UploadJob, mut on_progress: F) -> WorkflowResult<UploadResult>
    where
        F: FnMut(&UploadJob),
    {
        for attempt in 1..=self.max_attempts {
            match self.backend.status(&job.id).await {
                Ok(observation) => {
                    if let Some(result) = self.apply(&mut job, observation, &mut on_progress)? {
                        info!(upload_id = %job.id, attempts = attempt, "upload completed");
                        return Ok(result);
                    }
                }
                Err(e) if e.is_transient() => {
                    debug!(upload_id = %job.id, attempt, "transient poll error swallowed: {}", e);
                }
                Err(e) => return Err(e.into()),
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        warn!(
            upload_id = %job.id,
            attempts = self.max_attempts,
            "upload did not reach a terminal status before the poll ceiling"
        );
        Err(WorkflowError::UploadTimeout {
            attempts: self.max_attempts,
        })
    }

    /// Fold one observation into the job; `Some` means terminal success.
    fn apply<F>(
        &self,
        job: &mut UploadJob,
        observation: UploadStatusResponse,
        on_progress: &mut F,
    ) -> WorkflowResult<Option<UploadResult>>
    where
        F: FnMut(&UploadJob),
    {
        job.set_status(observation.status);
        job.set_progress(observation.progress);
        on_progress(job);

        match observation.status {
            UploadStatus::Completed => {
                let result = observation.result.ok_or_else(|| {
                    WorkflowError::protocol("completed status carried no result descriptor")
                })?;
                Ok(Some(result))
            }
            UploadStatus::Failed => {
                let message = observation
                    .error
                    .unwrap_or_else(|| "backend reported failure without detail".to_string());
                job.fail(message.clone());
                Err(WorkflowError::JobFailed(message))
            }
            UploadStatus::Pending | UploadStatus::Processing => Ok(None),
        }
    }
}
