//! The video workflow façade.
//!
//! Wires the resolver, local engine, remote dispatcher, orchestrator
//! and replace coordinator together and routes each dispatch to local
//! or server-side processing based on the user's preference, the
//! engine's availability and the parameters themselves.

use std::path::PathBuf;
use tracing::info;

use reelhire_client::{ApiClient, UploadRequest};
use reelhire_media::LocalEngine;
use reelhire_models::{
    CatalogMetadata, CatalogVideoEntry, EditParams, EditSession, EntryId, MediaSource, PlanTier,
    UploadJob, UploadResult,
};

use crate::config::WorkflowConfig;
use crate::dispatcher::RemoteDispatcher;
use crate::error::WorkflowResult;
use crate::orchestrator::UploadOrchestrator;
use crate::prefs::{PreferenceStore, ProcessingMode};
use crate::replace::{CatalogReplaceCoordinator, ReplaceOutcome};
use crate::resolver::SourceResolver;
use crate::warnings::WorkflowWarning;

/// Where a dispatch will be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingRoute {
    Local,
    Remote,
}

/// Route a dispatch.
///
/// Parameters that only the server can apply always go remote; an
/// explicit remote preference is honored; otherwise local processing
/// is used whenever the engine is available.
pub fn choose_route(
    mode: ProcessingMode,
    params: &EditParams,
    engine_ready: bool,
) -> ProcessingRoute {
    if params.needs_remote() {
        return ProcessingRoute::Remote;
    }
    match mode {
        ProcessingMode::Remote => ProcessingRoute::Remote,
        ProcessingMode::Auto | ProcessingMode::Local => {
            if engine_ready {
                ProcessingRoute::Local
            } else {
                ProcessingRoute::Remote
            }
        }
    }
}

/// Outcome of publishing a session as a new upload.
#[derive(Debug)]
pub struct SessionOutcome {
    /// The upload's result descriptor
    pub result: UploadResult,
    /// Local preview file, when the transform ran locally
    pub preview_path: Option<PathBuf>,
    /// Degradations recorded along the way
    pub warnings: Vec<WorkflowWarning>,
}

/// The edit/upload/replace workflow over one backend.
pub struct VideoWorkflow {
    engine: LocalEngine,
    resolver: SourceResolver,
    orchestrator: UploadOrchestrator<ApiClient>,
    dispatcher: RemoteDispatcher<ApiClient>,
    coordinator: CatalogReplaceCoordinator<ApiClient>,
    prefs: PreferenceStore,
    tier: PlanTier,
}

impl VideoWorkflow {
    /// Wire a workflow over an engine, a backend client and a
    /// preference store.
    pub fn new(
        engine: LocalEngine,
        client: ApiClient,
        config: WorkflowConfig,
        prefs: PreferenceStore,
        tier: PlanTier,
    ) -> Self {
        let resolver = SourceResolver::new(client.clone(), &config);
        let orchestrator = UploadOrchestrator::new(client.clone(), &config);
        let dispatcher = RemoteDispatcher::new(client.clone());
        let coordinator =
            CatalogReplaceCoordinator::new(client.clone(), UploadOrchestrator::new(client, &config));

        Self {
            engine,
            resolver,
            orchestrator,
            dispatcher,
            coordinator,
            prefs,
            tier,
        }
    }

    /// The persisted processing-mode preference.
    pub async fn processing_mode(&self) -> ProcessingMode {
        self.prefs.load().await
    }

    /// Persist a new processing-mode preference.
    pub async fn set_processing_mode(&self, mode: ProcessingMode) -> WorkflowResult<()> {
        self.prefs.save(mode).await
    }

    /// Whether the local engine currently holds a verified toolchain.
    pub fn local_engine_ready(&self) -> bool {
        self.engine.is_ready()
    }

    /// Publish a session as a brand-new upload.
    ///
    /// Resolves the source, applies the edit locally or dispatches it
    /// server-side, and drives the upload job to completion. The
    /// session's parameters are snapshotted at entry; later edits do
    /// not affect the in-flight work.
    pub async fn process_session<F>(
        &mut self,
        session: &EditSession,
        title: &str,
        mut on_progress: F,
    ) -> WorkflowResult<SessionOutcome>
    where
        F: FnMut(&UploadJob),
    {
        let params = session.snapshot();
        params.validate(session.duration_secs)?;

        let payload = self.resolver.resolve(&session.source).await?;
        let file_name = source_file_name(session);
        let mode = self.prefs.load().await;
        let engine_ready = self.prepare_local(mode, &params).await;

        if choose_route(mode, &params, engine_ready) == ProcessingRoute::Local {
            match self.engine.process(&payload, &params, self.tier, |_| {}).await {
                Ok(output) => {
                    let request = UploadRequest {
                        file_name,
                        title: title.to_string(),
                        transform: None,
                    };
                    let result = self
                        .orchestrator
                        .run(&output.payload, &request, |job| on_progress(job))
                        .await?;
                    return Ok(SessionOutcome {
                        result,
                        preview_path: Some(output.preview_path),
                        warnings: output.warnings.into_iter().map(Into::into).collect(),
                    });
                }
                Err(e) if e.is_unavailable() => {
                    info!("local engine dropped out, dispatching server-side: {}", e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let job = self
            .dispatcher
            .dispatch(&payload, source_file_name(session), title, &params)
            .await?;
        let result = self
            .orchestrator
            .drive(job, |job| on_progress(job))
            .await?;

        Ok(SessionOutcome {
            result,
            preview_path: None,
            warnings: Vec::new(),
        })
    }

    /// Replace an existing entry's media with the session's edited
    /// output.
    pub async fn replace_entry<F>(
        &mut self,
        entry_id: &EntryId,
        session: &EditSession,
        metadata: &CatalogMetadata,
        on_progress: F,
    ) -> WorkflowResult<ReplaceOutcome>
    where
        F: FnMut(&UploadJob),
    {
        let params = session.snapshot();
        params.validate(session.duration_secs)?;

        let payload = self.resolver.resolve(&session.source).await?;
        let mode = self.prefs.load().await;
        let engine_ready = self.prepare_local(mode, &params).await;

        if choose_route(mode, &params, engine_ready) == ProcessingRoute::Local {
            match self.engine.process(&payload, &params, self.tier, |_| {}).await {
                Ok(output) => {
                    let mut outcome = self
                        .coordinator
                        .replace_media(entry_id, &output.payload, metadata, None, on_progress)
                        .await?;
                    outcome
                        .warnings
                        .extend(output.warnings.into_iter().map(WorkflowWarning::from));
                    return Ok(outcome);
                }
                Err(e) if e.is_unavailable() => {
                    info!("local engine dropped out, dispatching server-side: {}", e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.coordinator
            .replace_media(entry_id, &payload, metadata, Some(params), on_progress)
            .await
    }

    /// Metadata-only update of an entry. Creates and deletes no
    /// upload jobs.
    pub async fn update_metadata(
        &self,
        entry_id: &EntryId,
        metadata: &CatalogMetadata,
    ) -> WorkflowResult<CatalogVideoEntry> {
        self.coordinator.update_metadata(entry_id, metadata).await
    }

    /// Initialize the engine when the route could be local.
    ///
    /// A failed initialization is informational; the dispatch simply
    /// goes server-side, and the engine remembers the failure so no
    /// further local attempts happen until it is disposed.
    async fn prepare_local(&mut self, mode: ProcessingMode, params: &EditParams) -> bool {
        if params.needs_remote() || mode == ProcessingMode::Remote {
            return false;
        }
        if self.engine.is_ready() {
            return true;
        }
        match self.engine.init().await {
            Ok(()) => true,
            Err(e) => {
                info!("local processing unavailable, using server-side: {}", e);
                false
            }
        }
    }
}

/// Derive the upload file name from the session's source.
fn source_file_name(session: &EditSession) -> String {
    match &session.source {
        MediaSource::LocalFile(path) => path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("{}.mp4", session.id)),
        _ => format!("{}.mp4", session.id),
    }
}
