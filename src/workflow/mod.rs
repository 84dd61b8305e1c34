//! Upload-and-present workflow
//!
//! Transport-independent orchestration of one inbound event:
//! receive → authorize → acquire → upload → present, with the temporary file
//! removed on every exit path. Button presses go through
//! [`Workflow::handle_selection`], which only reads the session store.

mod media;
mod view;

pub use media::{
    IncomingContent, MediaFetcher, MediaRef, TempImage, DEFAULT_FILE_NAME, DEFAULT_MIME_TYPE,
    MAX_FILE_SIZE,
};
#[cfg(test)]
pub use media::MockMediaFetcher;
pub use view::{DefaultView, WorkflowView};

use crate::auth::{is_allowed, AllowList};
use crate::error::WorkflowError;
use crate::formats::{
    derive_formats, render_choice_surface, render_selection, SelectionAction, Surface,
};
use crate::session::SessionStore;
use crate::upload::{ImageUploader, UploadRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Who sent an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Stable platform user ID
    pub user_id: i64,
    /// Name used for greetings only
    pub display_name: String,
}

/// Coordinates the gate, the uploader and the session store
pub struct Workflow {
    allow_list: AllowList,
    uploader: Arc<dyn ImageUploader>,
    auth_token: String,
    session: SessionStore,
}

impl Workflow {
    /// Create a workflow with an empty session store
    #[must_use]
    pub fn new(
        allow_list: AllowList,
        uploader: Arc<dyn ImageUploader>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            allow_list,
            uploader,
            auth_token: auth_token.into(),
            session: SessionStore::new(),
        }
    }

    /// Session store owned by this workflow
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Static greeting; no state change
    #[must_use]
    pub fn greet(&self, sender: &Sender) -> Surface {
        Surface::text(DefaultView::welcome(&sender.display_name))
    }

    /// Static usage help
    #[must_use]
    pub fn help(&self) -> Surface {
        Surface::text(DefaultView::help())
    }

    fn authorize(&self, sender: &Sender) -> Result<(), WorkflowError> {
        if is_allowed(&sender.user_id.to_string(), &self.allow_list) {
            Ok(())
        } else {
            Err(WorkflowError::Unauthorized {
                user_id: sender.user_id,
            })
        }
    }

    /// Handle one inbound message. Always yields exactly one reply.
    pub async fn handle_content(
        &self,
        sender: &Sender,
        content: &IncomingContent,
        fetcher: &dyn MediaFetcher,
    ) -> Surface {
        match self.upload_and_present(sender, content, fetcher).await {
            Ok(surface) => surface,
            Err(e) => {
                warn!(user_id = sender.user_id, error = %e, "Upload workflow failed");
                Surface::text(DefaultView::error_message(&e))
            }
        }
    }

    async fn upload_and_present(
        &self,
        sender: &Sender,
        content: &IncomingContent,
        fetcher: &dyn MediaFetcher,
    ) -> Result<Surface, WorkflowError> {
        let media = content.image().ok_or(WorkflowError::UnsupportedContent)?;
        self.authorize(sender)?;

        if media.file_size > MAX_FILE_SIZE {
            return Err(WorkflowError::FileTooLarge {
                size: media.file_size,
                max: MAX_FILE_SIZE,
            });
        }

        let file_name = media.upload_name();
        let temp = TempImage::allocate(&file_name)
            .map_err(|e| WorkflowError::Acquire(format!("temporary file: {e}")))?;
        info!(
            user_id = sender.user_id,
            file_name = %file_name,
            size = media.file_size,
            "Accepted image for upload"
        );

        fetcher
            .fetch(&media.file_id, temp.path())
            .await
            .map_err(|e| WorkflowError::Acquire(e.to_string()))?;

        let request = UploadRequest {
            path: temp.path().to_path_buf(),
            file_name,
            mime_type: media.upload_mime().to_string(),
            auth_token: self.auth_token.clone(),
        };
        let result = self.uploader.upload(&request).await;
        drop(temp);

        let url = result?;
        self.session.put(sender.user_id, derive_formats(&url)).await;
        Ok(render_choice_surface())
    }

    /// Handle a button press.
    ///
    /// Returns `None` for callback data this workflow does not own.
    pub async fn handle_selection(&self, sender: &Sender, data: &str) -> Option<Surface> {
        let Some(action) = SelectionAction::parse(data) else {
            debug!(data, "Ignoring unknown callback data");
            return None;
        };

        if let Err(e) = self.authorize(sender) {
            return Some(Surface::text(DefaultView::error_message(&e)));
        }

        let surface = match action {
            SelectionAction::Show(key) => {
                render_selection(key, &self.session, sender.user_id).await
            }
            SelectionAction::Return => render_choice_surface(),
        };
        Some(surface)
    }
}
