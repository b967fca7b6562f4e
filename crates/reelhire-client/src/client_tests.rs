//! Tests for the backend client against a mock HTTP server.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reelhire_models::{CatalogMetadata, EntryId, MediaPayload, UploadId, UploadStatus};

use crate::client::{ApiClient, ApiConfig};
use crate::error::ClientError;
use crate::types::{ReplaceMediaRequest, UploadRequest};

async fn client_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig::new(Url::parse(&server.uri()).unwrap());
    ApiClient::new(config).unwrap()
}

fn upload_request() -> UploadRequest {
    UploadRequest {
        file_name: "clip.mp4".into(),
        title: "Intro reel".into(),
        transform: None,
    }
}

#[tokio::test]
async fn test_upload_binary_returns_job_handle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/uploads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "upload_id": "up-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let payload = MediaPayload::mp4(vec![0u8; 64]);

    let id = client
        .upload_binary(&payload, &upload_request())
        .await
        .unwrap();
    assert_eq!(id, UploadId::from("up-1"));
}

#[tokio::test]
async fn test_upload_binary_surfaces_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/uploads"))
        .respond_with(ResponseTemplate::new(500).set_body_string("encoder pool exhausted"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let payload = MediaPayload::mp4(vec![0u8; 64]);

    let err = client
        .upload_binary(&payload, &upload_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Fetch { status: 500, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_poll_status_parses_canonical_schema() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uploads/up-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "processing",
            "progress": 40
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let status = client
        .poll_upload_status(&UploadId::from("up-1"))
        .await
        .unwrap();

    assert_eq!(status.status, UploadStatus::Processing);
    assert_eq!(status.progress, 40);
    assert!(status.result.is_none());
}

#[tokio::test]
async fn test_poll_status_rejects_nonconforming_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uploads/up-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": "uploading",
            "pct": 40
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .poll_upload_status(&UploadId::from("up-1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Schema(_)));
}

#[tokio::test]
async fn test_fetch_entry_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/catalog/entries/entry-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "entry-1",
            "title": "Intro reel",
            "description": "",
            "playback_url": "https://cdn.example.com/v/entry-1.mp4",
            "created_at": "2026-08-01T10:00:00Z",
            "updated_at": "2026-08-01T10:00:00Z"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let entry = client
        .fetch_entry_info(&EntryId::from("entry-1"))
        .await
        .unwrap();

    assert_eq!(entry.id, EntryId::from("entry-1"));
    assert_eq!(entry.playback_url, "https://cdn.example.com/v/entry-1.mp4");
}

#[tokio::test]
async fn test_replace_entry_media() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/catalog/entries/entry-1/replace"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "archived_prior_version": true })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let request = ReplaceMediaRequest {
        new_url: "https://cdn.example.com/v/new.mp4".into(),
        thumbnail_url: None,
        metadata: CatalogMetadata::titled("Intro reel"),
    };

    let response = client
        .replace_entry_media(&EntryId::from("entry-1"), &request)
        .await
        .unwrap();
    assert!(response.archived_prior_version);
}

#[tokio::test]
async fn test_replace_rejects_invalid_metadata_before_sending() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;

    let request = ReplaceMediaRequest {
        new_url: "https://cdn.example.com/v/new.mp4".into(),
        thumbnail_url: None,
        metadata: CatalogMetadata::titled(""),
    };

    let err = client
        .replace_entry_media(&EntryId::from("entry-1"), &request)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_update_entry_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/catalog/entries/entry-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client
        .update_entry_metadata(&EntryId::from("entry-1"), &CatalogMetadata::titled("Renamed"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_entry_maps_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/catalog/entries/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such entry"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.delete_entry(&EntryId::from("gone")).await.unwrap_err();

    assert!(matches!(err, ClientError::Fetch { status: 404, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_fetch_bytes_normalizes_remote_sources() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/clip.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![7u8; 128], "video/mp4"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let payload = client
        .fetch_bytes(&format!("{}/media/clip.mp4", server.uri()))
        .await
        .unwrap();

    assert_eq!(payload.len(), 128);
    assert_eq!(payload.content_type(), "video/mp4");
}

#[tokio::test]
async fn test_fetch_bytes_fails_on_missing_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/missing.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .fetch_bytes(&format!("{}/media/missing.mp4", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Fetch { status: 404, .. }));
}
