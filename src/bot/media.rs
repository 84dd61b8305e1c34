//! Media extraction from Telegram messages
//!
//! Maps photos and documents to [`IncomingContent`] and downloads files
//! through the Bot API into the workflow's temporary path.

use crate::workflow::{IncomingContent, MediaFetcher, MediaRef};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Describe what a message carries without downloading anything
///
/// Photos resolve to their largest variant by pixel area.
#[must_use]
pub fn extract_content(msg: &Message) -> IncomingContent {
    if let Some(photo) = msg
        .photo()
        .and_then(|sizes| sizes.iter().max_by_key(|p| u64::from(p.width) * u64::from(p.height)))
    {
        return IncomingContent::Photo(MediaRef {
            file_id: photo.file.id.0.clone(),
            file_size: photo.file.size,
            file_name: None,
            mime_type: None,
        });
    }

    if let Some(doc) = msg.document() {
        return IncomingContent::Document(MediaRef {
            file_id: doc.file.id.0.clone(),
            file_size: doc.file.size,
            file_name: doc.file_name.clone(),
            mime_type: doc.mime_type.as_ref().map(ToString::to_string),
        });
    }

    IncomingContent::Other
}

/// Downloads files through the Bot API
#[derive(Clone)]
pub struct TelegramFetcher {
    bot: Bot,
}

impl TelegramFetcher {
    /// Create a fetcher using `bot`
    #[must_use]
    pub const fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MediaFetcher for TelegramFetcher {
    async fn fetch(&self, file_id: &str, destination: &Path) -> Result<()> {
        let file = self.bot.get_file(FileId(file_id.to_string())).await?;
        let mut dst = tokio::fs::File::create(destination).await?;
        self.bot.download_file(&file.path, &mut dst).await?;
        dst.flush().await?;

        debug!(
            size = file.meta.size,
            path = %destination.display(),
            "Downloaded file from Telegram"
        );
        Ok(())
    }
}
