//! In-memory media payloads.

use std::fmt;

/// A normalized binary payload ready for local processing or network
/// transfer.
///
/// Downstream components never branch on where the bytes came from;
/// local files, remote fetches and prior processing passes all
/// produce this same value type.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaPayload {
    bytes: Vec<u8>,
    content_type: String,
}

impl MediaPayload {
    /// Wrap raw bytes with a MIME content type.
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    /// Wrap raw bytes as `video/mp4`, the platform's canonical format.
    pub fn mp4(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "video/mp4")
    }

    /// The payload bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the payload, returning the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The payload's MIME content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Payloads can be tens of megabytes; keep Debug output bounded.
impl fmt::Debug for MediaPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPayload")
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
