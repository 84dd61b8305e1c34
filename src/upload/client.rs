//! reqwest-backed upload client

use super::{ImageUploader, UploadError, UploadProtocol, UploadRequest, UploadResult};
use async_trait::async_trait;
use reqwest::multipart::Part;
use reqwest::{Client as HttpClient, StatusCode};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Client for the configured image hosting endpoint
///
/// One POST per call, no retries, HTTP client default timeouts.
#[derive(Debug, Clone)]
pub struct HostingClient {
    http: HttpClient,
    endpoint: String,
    protocol: Arc<dyn UploadProtocol>,
}

impl HostingClient {
    /// Create a client for `configured_url`, shaped by `protocol`
    #[must_use]
    pub fn new(configured_url: &str, protocol: Arc<dyn UploadProtocol>) -> Self {
        Self {
            http: HttpClient::new(),
            endpoint: protocol.endpoint(configured_url),
            protocol,
        }
    }

    /// Endpoint the client posts to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn file_part(request: &UploadRequest) -> Result<Part, UploadError> {
        let not_found = || {
            warn!(path = %request.path.display(), "Local file missing before upload");
            UploadError::FileNotFound {
                path: request.path.clone(),
            }
        };

        let metadata = tokio::fs::metadata(&request.path)
            .await
            .map_err(|_| not_found())?;
        if !metadata.is_file() {
            return Err(not_found());
        }
        let bytes = tokio::fs::read(&request.path)
            .await
            .map_err(|_| not_found())?;

        Part::bytes(bytes)
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type)
            .map_err(|e| UploadError::InvalidRequest(e.to_string()))
    }
}

#[async_trait]
impl ImageUploader for HostingClient {
    async fn upload(&self, request: &UploadRequest) -> UploadResult {
        let part = Self::file_part(request).await?;

        debug!(
            endpoint = %self.endpoint,
            provider = self.protocol.name(),
            file_name = %request.file_name,
            "Posting file to image host"
        );

        let response = self
            .protocol
            .authorize(self.http.post(&self.endpoint), part, &request.auth_token)
            .send()
            .await
            .map_err(|e| UploadError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Image host returned non-200 status");
            return Err(UploadError::Http {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Network(e.without_url().to_string()))?;

        let url = self.protocol.parse_response(&body)?;
        info!(url = %url, "Image uploaded");
        Ok(url)
    }
}
