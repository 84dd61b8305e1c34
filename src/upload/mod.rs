//! Image hosting upload client
//!
//! [`HostingClient`] posts a local file as multipart form data to the
//! configured endpoint. The way credentials are attached and the way the
//! provider's response is validated are delegated to an [`UploadProtocol`]
//! chosen at startup.

mod client;
mod protocol;

pub use client::HostingClient;
pub use protocol::{BearerProtocol, FormTokenProtocol, ProviderKind, UploadProtocol};

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Text surfaced when the provider rejects an upload without a message
pub const UNKNOWN_PROVIDER_ERROR: &str = "unknown error";

/// Classified upload failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// Local file missing or unreadable; raised before any network call.
    /// The path is logged, never shown to users.
    #[error("local file not found")]
    FileNotFound {
        /// Path that was checked
        path: PathBuf,
    },
    /// Request could not be built from the local file metadata
    #[error("invalid upload request: {0}")]
    InvalidRequest(String),
    /// Transport-level failure (connection refused, DNS, timeout)
    #[error("network error: {0}")]
    Network(String),
    /// Provider answered with a status other than 200
    #[error("HTTP error: status {status}")]
    Http {
        /// Response status code
        status: u16,
    },
    /// Provider answered 200 but reported a logical failure
    #[error("{message}")]
    ProviderRejected {
        /// Provider message, surfaced verbatim
        message: String,
    },
    /// Response body did not match the configured provider shape
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Outcome of one upload attempt: the hosted URL or a classified failure
pub type UploadResult = Result<String, UploadError>;

/// A locally acquired file ready to be pushed to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Temporary local path
    pub path: PathBuf,
    /// Original file name announced to the provider
    pub file_name: String,
    /// Declared MIME type
    pub mime_type: String,
    /// Provider credential
    pub auth_token: String,
}

/// Anything able to turn a local file into a hosted URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload one file. Never deletes or modifies the local file.
    async fn upload(&self, request: &UploadRequest) -> UploadResult;
}
