//! Typed HTTP client for the ReelHire backend.
//!
//! One canonical request/response schema per operation; payloads that
//! do not conform are rejected at the boundary rather than coerced.

pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
mod client_tests;

pub use client::{ApiClient, ApiConfig, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use types::{
    ReplaceMediaRequest, ReplaceMediaResponse, UploadCreated, UploadRequest, UploadStatusResponse,
};
