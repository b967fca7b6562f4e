//! Edit sessions.
//!
//! An `EditSession` is ephemeral: created when a user opens the
//! editor for a source video, destroyed when the editor closes or a
//! new source is selected. It never touches persistent storage.

use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::catalog::EntryId;
use crate::edit::EditParams;
use crate::payload::MediaPayload;

/// Unique identifier for an edit session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a session's media comes from.
///
/// Resolution normalizes all variants into a [`MediaPayload`], after
/// which no component branches on source kind again.
#[derive(Debug, Clone)]
pub enum MediaSource {
    /// A freshly selected local file
    LocalFile(PathBuf),
    /// A remote URL (typically a previously processed result)
    RemoteUrl(String),
    /// An existing catalog entry, resolved to its playback URL first
    CatalogEntry(EntryId),
    /// An in-memory result from a previous processing pass
    Memory(MediaPayload),
}

/// Session processing state flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingState {
    /// No transform in flight
    #[default]
    Idle,
    /// A local transform or remote job is in flight
    Processing,
    /// The last transform finished successfully
    Complete,
    /// The last transform failed
    Failed,
}

/// Ephemeral editing session over one source video.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Session id
    pub id: SessionId,
    /// Source reference
    pub source: MediaSource,
    /// Current edit parameters
    pub params: EditParams,
    /// Known source duration in seconds, once probed
    pub duration_secs: Option<f64>,
    /// Processing state flag
    pub state: ProcessingState,
}

impl EditSession {
    /// Open a session over a source with identity parameters.
    pub fn new(source: MediaSource) -> Self {
        Self {
            id: SessionId::new(),
            source,
            params: EditParams::default(),
            duration_secs: None,
            state: ProcessingState::Idle,
        }
    }

    /// Snapshot the current parameters for dispatch.
    ///
    /// Edits made after a transform is dispatched never affect the
    /// in-flight job; the dispatched copy is this clone.
    pub fn snapshot(&self) -> EditParams {
        self.params.clone()
    }

    /// Replace the source, resetting parameters and state.
    pub fn reset_source(&mut self, source: MediaSource) {
        self.source = source;
        self.params = EditParams::default();
        self.duration_secs = None;
        self.state = ProcessingState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut session = EditSession::new(MediaSource::LocalFile("clip.mp4".into()));
        session.params.trim_start = 5.0;
        session.params.trim_end = 20.0;

        let snapshot = session.snapshot();
        session.params.trim_end = 25.0;

        assert!((snapshot.trim_end - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset_source_clears_state() {
        let mut session = EditSession::new(MediaSource::LocalFile("clip.mp4".into()));
        session.params.brightness = 40;
        session.duration_secs = Some(30.0);
        session.state = ProcessingState::Complete;

        session.reset_source(MediaSource::CatalogEntry(EntryId::from("entry-1")));

        assert_eq!(session.params, EditParams::default());
        assert_eq!(session.duration_secs, None);
        assert_eq!(session.state, ProcessingState::Idle);
    }
}
