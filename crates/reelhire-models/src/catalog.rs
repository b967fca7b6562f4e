//! Catalog video entry models.
//!
//! Catalog entries are owned by the backend; the client reads them
//! and issues update/replace requests. An entry's playback URL must
//! always resolve to a playable asset.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Backend-assigned catalog entry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A catalog video entry visible to other users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogVideoEntry {
    /// Entry id
    pub id: EntryId,
    /// Display title
    pub title: String,
    /// Description text
    #[serde(default)]
    pub description: String,
    /// Playback URL; must resolve to a playable asset
    pub playback_url: String,
    /// Thumbnail URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// User-editable entry metadata, validated before any update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
pub struct CatalogMetadata {
    /// Display title
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    /// Description text
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: String,
}

impl CatalogMetadata {
    /// Create metadata with an empty description.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
        }
    }
}
