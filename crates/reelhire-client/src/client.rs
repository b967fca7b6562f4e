//! Backend API client.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;
use validator::Validate;

use reelhire_models::{CatalogMetadata, CatalogVideoEntry, EntryId, MediaPayload, UploadId};

use crate::error::{ClientError, ClientResult};
use crate::types::{
    ReplaceMediaRequest, ReplaceMediaResponse, UploadCreated, UploadRequest, UploadStatusResponse,
};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the backend client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend base URL
    pub base_url: Url,
    /// Bearer token, when the session is authenticated
    pub auth_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Create a config for a base URL with defaults.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        let base_url = std::env::var("REELHIRE_API_BASE_URL")
            .map_err(|_| ClientError::config("REELHIRE_API_BASE_URL not set"))?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ClientError::config(format!("REELHIRE_API_BASE_URL invalid: {}", e)))?;

        let timeout = std::env::var("REELHIRE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            base_url,
            auth_token: std::env::var("REELHIRE_API_TOKEN").ok(),
            timeout,
        })
    }

    /// Attach a bearer token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// Typed JSON-over-HTTP client for the ReelHire backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a client from configuration.
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ApiConfig::from_env()?)
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        let mut request = self.http.request(method, url);
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Begin an asynchronous ingestion job for a binary payload.
    ///
    /// The payload and its metadata (including any server-side
    /// transform parameters) travel in one multipart request; the
    /// returned handle is polled via [`poll_upload_status`].
    ///
    /// [`poll_upload_status`]: ApiClient::poll_upload_status
    pub async fn upload_binary(
        &self,
        payload: &MediaPayload,
        request: &UploadRequest,
    ) -> ClientResult<UploadId> {
        let metadata = serde_json::to_string(request)
            .map_err(|e| ClientError::invalid_request(e.to_string()))?;

        let file_part = Part::bytes(payload.bytes().to_vec())
            .file_name(request.file_name.clone())
            .mime_str(payload.content_type())?;

        let form = Form::new()
            .part("metadata", Part::text(metadata))
            .part("file", file_part);

        debug!(
            file_name = %request.file_name,
            size = payload.len(),
            "submitting upload"
        );

        let response = self
            .request(Method::POST, self.endpoint("api/uploads"))
            .multipart(form)
            .send()
            .await?;

        let created: UploadCreated = decode(response, "upload_binary").await?;
        info!(upload_id = %created.upload_id, "upload accepted");
        Ok(created.upload_id)
    }

    /// Read the current status of an ingestion job.
    pub async fn poll_upload_status(&self, id: &UploadId) -> ClientResult<UploadStatusResponse> {
        let response = self
            .request(Method::GET, self.endpoint(&format!("api/uploads/{}", id)))
            .send()
            .await?;

        decode(response, "poll_upload_status").await
    }

    /// Repoint an existing entry at newly ingested media. The backend
    /// archives the prior version atomically on its side.
    pub async fn replace_entry_media(
        &self,
        entry_id: &EntryId,
        request: &ReplaceMediaRequest,
    ) -> ClientResult<ReplaceMediaResponse> {
        request
            .metadata
            .validate()
            .map_err(|e| ClientError::invalid_request(e.to_string()))?;

        let response = self
            .request(
                Method::POST,
                self.endpoint(&format!("api/catalog/entries/{}/replace", entry_id)),
            )
            .json(request)
            .send()
            .await?;

        decode(response, "replace_entry_media").await
    }

    /// Lightweight metadata-only update of an entry.
    pub async fn update_entry_metadata(
        &self,
        entry_id: &EntryId,
        metadata: &CatalogMetadata,
    ) -> ClientResult<()> {
        metadata
            .validate()
            .map_err(|e| ClientError::invalid_request(e.to_string()))?;

        let response = self
            .request(
                Method::PATCH,
                self.endpoint(&format!("api/catalog/entries/{}", entry_id)),
            )
            .json(metadata)
            .send()
            .await?;

        ensure_success(response).await
    }

    /// Delete an entry. Callers decide whether a failure is fatal;
    /// the replace coordinator treats it as best-effort.
    pub async fn delete_entry(&self, entry_id: &EntryId) -> ClientResult<()> {
        let response = self
            .request(
                Method::DELETE,
                self.endpoint(&format!("api/catalog/entries/{}", entry_id)),
            )
            .send()
            .await?;

        ensure_success(response).await
    }

    /// Fetch an entry, including the playback URL used to derive a
    /// previewable address after server-side processing.
    pub async fn fetch_entry_info(&self, entry_id: &EntryId) -> ClientResult<CatalogVideoEntry> {
        let response = self
            .request(
                Method::GET,
                self.endpoint(&format!("api/catalog/entries/{}", entry_id)),
            )
            .send()
            .await?;

        decode(response, "fetch_entry_info").await
    }

    /// Fetch a remote source into memory.
    ///
    /// Used by the media source resolver for remote URLs; the result
    /// is the same value type a local file read produces.
    pub async fn fetch_bytes(&self, url: &str) -> ClientResult<MediaPayload> {
        let response = self.request(Method::GET, url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::fetch(
                status.as_u16(),
                format!("fetching {}", url),
            ));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("video/mp4")
            .to_string();

        let bytes = response.bytes().await?;
        Ok(MediaPayload::new(bytes.to_vec(), content_type))
    }
}

/// Decode a response against an operation's canonical schema.
async fn decode<T: DeserializeOwned>(response: reqwest::Response, operation: &str) -> ClientResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ClientError::fetch(status.as_u16(), truncate(&body)));
    }

    serde_json::from_str(&body).map_err(|e| ClientError::schema(format!("{}: {}", operation, e)))
}

/// Check a response for success, discarding the body.
async fn ensure_success(response: reqwest::Response) -> ClientResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::fetch(status.as_u16(), truncate(&body)))
}

/// Bound error bodies carried into error messages.
fn truncate(body: &str) -> String {
    const MAX: usize = 256;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    }
}
