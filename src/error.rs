//! Workflow error taxonomy
//!
//! Every variant is caught at the orchestrator boundary and turned into a
//! single text reply; nothing here is allowed to reach the dispatcher.

use crate::upload::UploadError;
use thiserror::Error;

/// Why an inbound event could not be turned into links
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// User is not on the allow-list
    #[error("user {user_id} is not allowed")]
    Unauthorized {
        /// Rejected user
        user_id: i64,
    },
    /// Message carried neither a photo nor an image document
    #[error("unsupported content")]
    UnsupportedContent,
    /// Telegram refuses to hand out files above its download limit
    #[error("file too large: {size} bytes (max {max} bytes)")]
    FileTooLarge {
        /// Declared size
        size: u32,
        /// Accepted maximum
        max: u32,
    },
    /// Download from Telegram to the temporary file failed
    #[error("failed to acquire file: {0}")]
    Acquire(String),
    /// Upload attempt failed
    #[error("upload failed: {0}")]
    Upload(#[from] UploadError),
}
