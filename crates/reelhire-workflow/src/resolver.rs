//! Media source resolution.
//!
//! Normalizes every source kind into one in-memory payload so that
//! downstream components never branch on origin again.

use tracing::debug;

use reelhire_client::{ApiClient, ClientError};
use reelhire_models::{format_bytes, MediaPayload, MediaSource};

use crate::config::WorkflowConfig;
use crate::error::WorkflowResult;
use crate::retry::{retry_async, RetryConfig};

/// Resolves a session's source reference into a byte payload.
#[derive(Debug, Clone)]
pub struct SourceResolver {
    client: ApiClient,
    retry: RetryConfig,
}

impl SourceResolver {
    /// Create a resolver over the backend client.
    pub fn new(client: ApiClient, config: &WorkflowConfig) -> Self {
        Self {
            client,
            retry: RetryConfig::new("fetch_source")
                .with_max_retries(config.fetch_retries)
                .with_base_delay(config.fetch_retry_base_delay),
        }
    }

    /// Resolve a source into a payload.
    ///
    /// Local files are read directly; remote URLs are fetched
    /// (retrying transient failures); catalog entries are first
    /// resolved to their playback URL; in-memory results pass
    /// through.
    pub async fn resolve(&self, source: &MediaSource) -> WorkflowResult<MediaPayload> {
        match source {
            MediaSource::LocalFile(path) => {
                let bytes = tokio::fs::read(path).await?;
                debug!(
                    path = %path.display(),
                    size = %format_bytes(bytes.len() as u64),
                    "read local source"
                );
                Ok(MediaPayload::mp4(bytes))
            }
            MediaSource::RemoteUrl(url) => self.fetch(url).await,
            MediaSource::CatalogEntry(entry_id) => {
                let entry = self.client.fetch_entry_info(entry_id).await?;
                debug!(entry_id = %entry_id, url = %entry.playback_url, "resolved catalog source");
                self.fetch(&entry.playback_url).await
            }
            MediaSource::Memory(payload) => Ok(payload.clone()),
        }
    }

    async fn fetch(&self, url: &str) -> WorkflowResult<MediaPayload> {
        let payload = retry_async(&self.retry, |e: &ClientError| e.is_transient(), || {
            self.client.fetch_bytes(url)
        })
        .await?;
        Ok(payload)
    }
}
