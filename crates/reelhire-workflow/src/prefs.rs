//! Processing-mode preference.
//!
//! The only client-side persistence in the workflow: one flag
//! recording whether the user prefers local or server-side
//! processing, stored as a small JSON file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::error::{WorkflowError, WorkflowResult};

/// How transforms should be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Local when the engine is available, server-side otherwise
    #[default]
    Auto,
    /// Always process locally when possible
    Local,
    /// Always process server-side
    Remote,
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Auto => "auto",
            ProcessingMode::Local => "local",
            ProcessingMode::Remote => "remote",
        }
    }
}

impl std::fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PreferenceFile {
    processing_mode: ProcessingMode,
}

/// File-backed store for the processing-mode flag.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Create a store over a file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the preference. A missing or unreadable file yields the
    /// default; a corrupted file is logged and yields the default.
    pub async fn load(&self) -> ProcessingMode {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(_) => return ProcessingMode::default(),
        };

        match serde_json::from_str::<PreferenceFile>(&contents) {
            Ok(file) => file.processing_mode,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    "preference file corrupted, using default: {}",
                    e
                );
                ProcessingMode::default()
            }
        }
    }

    /// Persist the preference.
    pub async fn save(&self, mode: ProcessingMode) -> WorkflowResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(&PreferenceFile {
            processing_mode: mode,
        })
        .map_err(|e| WorkflowError::preferences(e.to_string()))?;

        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}
