//! Inbound media description, acquisition seam and temporary file guard

use anyhow::Result;
use async_trait::async_trait;
use std::io;
use std::path::Path;
use tempfile::TempPath;
use tracing::debug;

/// Maximum file size the Telegram Bot API lets us download (20 MB)
pub const MAX_FILE_SIZE: u32 = 20 * 1024 * 1024;

/// File name used when the message does not carry one
pub const DEFAULT_FILE_NAME: &str = "image.jpg";

/// MIME type used when the message does not declare one
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Reference to a remote file that can be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    /// Platform file identifier
    pub file_id: String,
    /// Declared size in bytes
    pub file_size: u32,
    /// Declared file name, documents only
    pub file_name: Option<String>,
    /// Declared MIME type, documents only
    pub mime_type: Option<String>,
}

impl MediaRef {
    /// Name to announce to the image host
    #[must_use]
    pub fn upload_name(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).file_name())
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string()
    }

    /// MIME type to announce to the image host
    #[must_use]
    pub fn upload_mime(&self) -> &str {
        self.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE)
    }
}

/// What an inbound message carried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingContent {
    /// Compressed photo (highest resolution variant)
    Photo(MediaRef),
    /// File attachment with its declared metadata
    Document(MediaRef),
    /// Anything else: text, stickers, voice...
    Other,
}

impl IncomingContent {
    /// The media to upload, if this content is an image.
    ///
    /// Documents qualify only when their declared MIME type starts with `image/`.
    #[must_use]
    pub fn image(&self) -> Option<&MediaRef> {
        match self {
            Self::Photo(media) => Some(media),
            Self::Document(media)
                if media
                    .mime_type
                    .as_deref()
                    .is_some_and(|mime| mime.starts_with("image/")) =>
            {
                Some(media)
            }
            Self::Document(_) | Self::Other => None,
        }
    }
}

/// Downloads a remote file to a local path
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Write the file identified by `file_id` to `destination`
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the file or the write fails.
    async fn fetch(&self, file_id: &str, destination: &Path) -> Result<()>;
}

/// Longest extension carried over into the local temp file name
const MAX_SUFFIX_LEN: usize = 8;

/// `.ext` of `file_name` when it is short plain ASCII, else empty
fn temp_suffix(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_SUFFIX_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// A per-request temporary file, deleted when dropped
///
/// Only the extension of the declared name reaches the local path; the full
/// name travels to the image host in the upload request instead.
#[derive(Debug)]
pub struct TempImage {
    path: TempPath,
}

impl TempImage {
    /// Create an empty file under the system temp directory
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn allocate(file_name: &str) -> io::Result<Self> {
        Self::allocate_in(&std::env::temp_dir(), file_name)
    }

    /// Create an empty file under `dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn allocate_in(dir: &Path, file_name: &str) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("imglink-")
            .suffix(&temp_suffix(file_name))
            .tempfile_in(dir)?;
        let path = file.into_temp_path();
        debug!(path = %path.display(), "Created temporary file");
        Ok(Self { path })
    }

    /// Local path of the file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
