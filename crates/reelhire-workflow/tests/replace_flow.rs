//! End-to-end tests for the replace workflow against a mock backend.
//!
//! These drive the full `VideoWorkflow` surface: source resolution,
//! routing, remote dispatch, polling and the catalog replace protocol.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reelhire_client::{ApiClient, ApiConfig};
use reelhire_media::{EngineConfig, LocalEngine, LocateStrategy};
use reelhire_models::{
    CatalogMetadata, EditSession, EntryId, MediaSource, PlanTier, Segment, UploadStatus,
};
use reelhire_workflow::{PreferenceStore, ProcessingMode, VideoWorkflow, WorkflowConfig};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelhire_workflow=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// An engine whose discovery can never succeed, so every dispatch
/// goes server-side.
fn unavailable_engine() -> LocalEngine {
    LocalEngine::new(EngineConfig {
        strategies: vec![LocateStrategy::ExplicitDir(PathBuf::from(
            "/nonexistent/ffmpeg/dir",
        ))],
        verify_timeout: Duration::from_millis(100),
        ..Default::default()
    })
}

fn workflow_for(server: &MockServer, prefs_dir: &std::path::Path) -> VideoWorkflow {
    let client = ApiClient::new(ApiConfig::new(Url::parse(&server.uri()).unwrap())).unwrap();
    let config = WorkflowConfig {
        poll_interval: Duration::from_millis(1),
        ..Default::default()
    };
    VideoWorkflow::new(
        unavailable_engine(),
        client,
        config,
        PreferenceStore::new(prefs_dir.join("prefs.json")),
        PlanTier::Premium,
    )
}

fn entry_json(server: &MockServer) -> serde_json::Value {
    serde_json::json!({
        "id": "entry-1",
        "title": "Intro reel",
        "description": "",
        "playback_url": format!("{}/media/new.mp4", server.uri()),
        "created_at": "2026-08-01T10:00:00Z",
        "updated_at": "2026-08-05T09:00:00Z"
    })
}

/// Mount the upload endpoints: submission plus a poll sequence that
/// reports pending, then processing, then completed.
async fn mount_upload_flow(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/uploads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "upload_id": "up-1"
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/uploads/up-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "pending",
            "progress": 0
        })))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/uploads/up-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "processing",
            "progress": 60
        })))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/uploads/up-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed",
            "progress": 100,
            "result": {
                "url": format!("{}/media/new.mp4", server.uri()),
                "duration_secs": 12.0,
                "size_bytes": 2048,
                "entry_id": "temp-9"
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn replace_via_remote_dispatch_repoints_entry_and_cleans_up() {
    init_logging();
    let server = MockServer::start().await;
    mount_upload_flow(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/catalog/entries/entry-1/replace"))
        .and(body_partial_json(serde_json::json!({
            "new_url": format!("{}/media/new.mp4", server.uri())
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "archived_prior_version": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/catalog/entries/temp-9"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/catalog/entries/entry-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entry_json(&server)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("clip.mp4");
    tokio::fs::write(&source, vec![0u8; 256]).await.unwrap();

    let mut workflow = workflow_for(&server, dir.path());
    let mut session = EditSession::new(MediaSource::LocalFile(source));
    session.params.trim_start = 0.0;
    session.params.trim_end = 30.0;
    session.params.segments = vec![
        Segment::new(2.0, 8.0).unwrap(),
        Segment::new(12.0, 18.0).unwrap(),
    ];

    let mut statuses = Vec::new();
    let outcome = workflow
        .replace_entry(
            &EntryId::from("entry-1"),
            &session,
            &CatalogMetadata::titled("Intro reel"),
            |job| statuses.push(job.status),
        )
        .await
        .expect("replace flow failed");

    assert!(outcome.archived_prior_version);
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.result.entry_id, EntryId::from("temp-9"));

    let entry = outcome.entry.expect("refresh should have succeeded");
    assert_eq!(entry.playback_url, format!("{}/media/new.mp4", server.uri()));

    // Every poll observation was surfaced, ending in the terminal one
    assert_eq!(
        statuses,
        vec![
            UploadStatus::Pending,
            UploadStatus::Processing,
            UploadStatus::Completed,
        ]
    );
}

#[tokio::test]
async fn remote_preference_skips_local_engine_entirely() {
    init_logging();
    let server = MockServer::start().await;
    mount_upload_flow(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/catalog/entries/entry-1/replace"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "archived_prior_version": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/catalog/entries/temp-9"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/catalog/entries/entry-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entry_json(&server)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("clip.mp4");
    tokio::fs::write(&source, vec![0u8; 64]).await.unwrap();

    let mut workflow = workflow_for(&server, dir.path());
    workflow
        .set_processing_mode(ProcessingMode::Remote)
        .await
        .unwrap();
    assert_eq!(workflow.processing_mode().await, ProcessingMode::Remote);

    let mut session = EditSession::new(MediaSource::LocalFile(source));
    session.params.trim_start = 1.0;
    session.params.trim_end = 9.0;

    let outcome = workflow
        .replace_entry(
            &EntryId::from("entry-1"),
            &session,
            &CatalogMetadata::titled("Intro reel"),
            |_| {},
        )
        .await
        .expect("replace flow failed");

    // The engine was never probed; the dispatch went straight remote
    assert!(!workflow.local_engine_ready());
    assert!(!outcome.archived_prior_version);
}

#[tokio::test]
async fn upload_timeout_leaves_entry_untouched() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/uploads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "upload_id": "up-1"
        })))
        .mount(&server)
        .await;
    // The job never reaches a terminal status
    Mock::given(method("GET"))
        .and(path("/api/uploads/up-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "processing",
            "progress": 10
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/catalog/entries/entry-1/replace"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("clip.mp4");
    tokio::fs::write(&source, vec![0u8; 64]).await.unwrap();

    let client = ApiClient::new(ApiConfig::new(Url::parse(&server.uri()).unwrap())).unwrap();
    let config = WorkflowConfig {
        poll_interval: Duration::from_millis(1),
        max_poll_attempts: 5,
        ..Default::default()
    };
    let mut workflow = VideoWorkflow::new(
        unavailable_engine(),
        client,
        config,
        PreferenceStore::new(dir.path().join("prefs.json")),
        PlanTier::Standard,
    );

    let mut session = EditSession::new(MediaSource::LocalFile(source));
    session.params.trim_start = 1.0;
    session.params.trim_end = 9.0;

    let err = workflow
        .replace_entry(
            &EntryId::from("entry-1"),
            &session,
            &CatalogMetadata::titled("Intro reel"),
            |_| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        reelhire_workflow::WorkflowError::UploadTimeout { attempts: 5 }
    ));
}
