//! Catalog replace coordination.
//!
//! When replacing an existing entry's media the visible entry must
//! never point at an unconfirmed URL. Steps run strictly in order:
//! upload and confirm, repoint the entry (the backend archives the
//! prior version atomically on its side), best-effort temporary-entry
//! cleanup, refresh. Failures before the repoint abort with no
//! visible mutation; failures after it are downgraded to warnings.

use tracing::{info, warn};

use reelhire_client::{ApiClient, ReplaceMediaRequest, UploadRequest};
use reelhire_models::{
    CatalogMetadata, CatalogVideoEntry, EditParams, EntryId, MediaPayload, UploadJob, UploadResult,
};

use crate::backend::UploadBackend;
use crate::error::WorkflowResult;
use crate::orchestrator::UploadOrchestrator;
use crate::warnings::WorkflowWarning;

/// Outcome of a media replace.
#[derive(Debug)]
pub struct ReplaceOutcome {
    /// The refreshed entry, when the final refresh succeeded
    pub entry: Option<CatalogVideoEntry>,
    /// The upload's result descriptor
    pub result: UploadResult,
    /// Whether the backend archived a prior version
    pub archived_prior_version: bool,
    /// Post-confirmation degradations
    pub warnings: Vec<WorkflowWarning>,
}

/// Sequences the archive-old → point-to-new → delete-temporary
/// protocol for replacing an entry's media.
#[derive(Debug, Clone)]
pub struct CatalogReplaceCoordinator<B> {
    client: ApiClient,
    orchestrator: UploadOrchestrator<B>,
}

impl<B: UploadBackend> CatalogReplaceCoordinator<B> {
    /// Create a coordinator.
    pub fn new(client: ApiClient, orchestrator: UploadOrchestrator<B>) -> Self {
        Self {
            client,
            orchestrator,
        }
    }

    /// Replace an entry's media with a new payload.
    ///
    /// `transform` carries server-side edit parameters when the
    /// payload has not already been processed locally.
    pub async fn replace_media<F>(
        &self,
        entry_id: &EntryId,
        payload: &MediaPayload,
        metadata: &CatalogMetadata,
        transform: Option<EditParams>,
        on_progress: F,
    ) -> WorkflowResult<ReplaceOutcome>
    where
        F: FnMut(&UploadJob),
    {
        // Step 1: upload the new binary and wait for the confirmed URL.
        let request = UploadRequest {
            file_name: format!("{}.mp4", entry_id),
            title: metadata.title.clone(),
            transform,
        };
        let result = self.orchestrator.run(payload, &request, on_progress).await?;

        // Step 2: repoint the entry. The entry is never pointed at a
        // URL that has not been confirmed live by step 1.
        let replace = self
            .client
            .replace_entry_media(
                entry_id,
                &ReplaceMediaRequest {
                    new_url: result.url.clone(),
                    thumbnail_url: result.thumbnail_url.clone(),
                    metadata: metadata.clone(),
                },
            )
            .await?;
        info!(
            entry_id = %entry_id,
            archived = replace.archived_prior_version,
            "entry repointed at new media"
        );

        let mut warnings = Vec::new();

        // Step 3: delete the temporary entry created by the upload
        // path. Best effort; the visible catalog state is already
        // correct.
        if let Err(e) = self.client.delete_entry(&result.entry_id).await {
            warn!(
                entry_id = %result.entry_id,
                "temporary entry cleanup failed: {}",
                e
            );
            warnings.push(WorkflowWarning::PartialCleanup {
                entry_id: result.entry_id.clone(),
                reason: e.to_string(),
            });
        }

        // Step 4: refresh the local catalog view.
        let entry = match self.client.fetch_entry_info(entry_id).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(entry_id = %entry_id, "catalog view refresh failed: {}", e);
                warnings.push(WorkflowWarning::ViewRefreshFailed {
                    reason: e.to_string(),
                });
                None
            }
        };

        Ok(ReplaceOutcome {
            entry,
            result,
            archived_prior_version: replace.archived_prior_version,
            warnings,
        })
    }

    /// Metadata-only update. Creates and deletes no upload jobs.
    pub async fn update_metadata(
        &self,
        entry_id: &EntryId,
        metadata: &CatalogMetadata,
    ) -> WorkflowResult<CatalogVideoEntry> {
        self.client.update_entry_metadata(entry_id, metadata).await?;
        Ok(self.client.fetch_entry_info(entry_id).await?)
    }
}
