//! User-facing texts of the upload workflow

use crate::error::WorkflowError;
use crate::upload::UploadError;

/// Text rendering for workflow replies
pub trait WorkflowView {
    /// Greeting for `/start`
    fn welcome(display_name: &str) -> String;

    /// Text for `/help`
    fn help() -> &'static str;

    /// Reply to anything that is not an image
    fn unsupported_content() -> &'static str;

    /// Reply to users outside the allow-list
    fn not_permitted() -> &'static str;

    /// Reply to documents above the download limit
    fn file_too_large(max_bytes: u32) -> String;

    /// Reply when Telegram would not hand over the file
    fn acquire_failed() -> &'static str;

    /// Reply when the upload failed
    fn upload_failed(error: &UploadError) -> String;

    /// Map any workflow error to its reply
    fn error_message(error: &WorkflowError) -> String {
        match error {
            WorkflowError::Unauthorized { .. } => Self::not_permitted().to_string(),
            WorkflowError::UnsupportedContent => Self::unsupported_content().to_string(),
            WorkflowError::FileTooLarge { max, .. } => Self::file_too_large(*max),
            WorkflowError::Acquire(_) => Self::acquire_failed().to_string(),
            WorkflowError::Upload(e) => Self::upload_failed(e),
        }
    }
}

/// Default English texts
pub struct DefaultView;

impl WorkflowView for DefaultView {
    fn welcome(display_name: &str) -> String {
        format!(
            "👋 Hi, {display_name}! Send me a photo or an image file and I'll upload it \
             and give you a shareable link."
        )
    }

    fn help() -> &'static str {
        "Send a photo or an image document (PNG, JPEG, GIF, WebP...).\n\
         After the upload, pick a format: direct link, HTML, BBCode or Markdown."
    }

    fn unsupported_content() -> &'static str {
        "⚠️ Unsupported content. Please send a photo or an image file."
    }

    fn not_permitted() -> &'static str {
        "⛔️ You are not permitted to use this bot."
    }

    fn file_too_large(max_bytes: u32) -> String {
        format!(
            "⚠️ File is too large. Maximum size is {} MB.",
            max_bytes / 1024 / 1024
        )
    }

    fn acquire_failed() -> &'static str {
        "❌ Could not download the file from Telegram. Please try again."
    }

    fn upload_failed(error: &UploadError) -> String {
        format!("❌ Upload failed: {error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_surfaced_verbatim() {
        let error = WorkflowError::Upload(UploadError::ProviderRejected {
            message: "quota exceeded".to_string(),
        });
        assert_eq!(
            DefaultView::error_message(&error),
            "❌ Upload failed: quota exceeded"
        );
    }

    #[test]
    fn test_http_error_mentions_status() {
        let error = WorkflowError::Upload(UploadError::Http { status: 500 });
        assert!(DefaultView::error_message(&error).contains("500"));
    }

    #[test]
    fn test_missing_file_hides_local_path() {
        let error = WorkflowError::Upload(UploadError::FileNotFound {
            path: "/tmp/imglink-abc123.png".into(),
        });
        let reply = DefaultView::error_message(&error);
        assert!(reply.starts_with("❌ Upload failed"));
        assert!(!reply.contains("/tmp"));
        assert!(!reply.contains("imglink-"));
    }

    #[test]
    fn test_welcome_uses_display_name() {
        assert!(DefaultView::welcome("Alice").contains("Alice"));
    }

    #[test]
    fn test_too_large_in_megabytes() {
        assert!(DefaultView::file_too_large(20 * 1024 * 1024).contains("20 MB"));
    }
}
