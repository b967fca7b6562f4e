//! Shared data models for the ReelHire video workflow.
//!
//! This crate provides Serde-serializable types for:
//! - Edit sessions and edit parameters
//! - Time segments and plan tiers
//! - Upload jobs and their status lifecycle
//! - Catalog video entries
//! - Encoding configuration

pub mod catalog;
pub mod edit;
pub mod encoding;
pub mod job;
pub mod payload;
pub mod segment;
pub mod session;
pub mod tier;

// Re-export common types
pub use catalog::{CatalogMetadata, CatalogVideoEntry, EntryId};
pub use edit::{
    AudioMixParams, CropRect, EditParams, EditParamsError, OverlayParams, OverlayPosition,
    Rotation, ScaleDims,
};
pub use encoding::EncodingConfig;
pub use job::{UploadId, UploadJob, UploadResult, UploadStatus};
pub use payload::MediaPayload;
pub use segment::{Segment, SegmentError};
pub use session::{EditSession, MediaSource, ProcessingState, SessionId};
pub use tier::{format_bytes, PlanTier};
