//! Provider-specific request shaping and response validation

use super::{UploadError, UploadResult, UNKNOWN_PROVIDER_ERROR};
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// How credentials are attached and how a 200 response is interpreted
pub trait UploadProtocol: Send + Sync + fmt::Debug {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Final endpoint derived from the configured URL
    fn endpoint(&self, configured: &str) -> String {
        configured.to_string()
    }

    /// Attach the file part and the credential to the request
    fn authorize(&self, request: RequestBuilder, file: Part, token: &str) -> RequestBuilder;

    /// Validate a 200 response body and extract the hosted URL
    ///
    /// # Errors
    ///
    /// Returns `ProviderRejected` for logical failures reported by the
    /// provider and `MalformedResponse` when the body is not understood.
    fn parse_response(&self, body: &str) -> UploadResult;
}

// ─────────────────────────────────────────────────────────────────────────────
// Form-token provider (EasyImages)
// ─────────────────────────────────────────────────────────────────────────────

/// Token sent as a form field; body `{"result","code","url","message"}`
#[derive(Debug, Clone)]
pub struct FormTokenProtocol {
    file_field: String,
    token_field: String,
}

impl FormTokenProtocol {
    /// Default multipart field holding the file
    pub const DEFAULT_FILE_FIELD: &'static str = "image";
    /// Default multipart field holding the token
    pub const DEFAULT_TOKEN_FIELD: &'static str = "token";

    /// Create with explicit field names
    #[must_use]
    pub fn new(file_field: impl Into<String>, token_field: impl Into<String>) -> Self {
        Self {
            file_field: file_field.into(),
            token_field: token_field.into(),
        }
    }
}

impl Default for FormTokenProtocol {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE_FIELD, Self::DEFAULT_TOKEN_FIELD)
    }
}

#[derive(Debug, Deserialize)]
struct FormTokenResponse {
    result: Option<String>,
    code: Option<i64>,
    url: Option<String>,
    message: Option<String>,
}

impl UploadProtocol for FormTokenProtocol {
    fn name(&self) -> &'static str {
        "easyimage"
    }

    fn authorize(&self, request: RequestBuilder, file: Part, token: &str) -> RequestBuilder {
        let form = Form::new()
            .part(self.file_field.clone(), file)
            .text(self.token_field.clone(), token.to_string());
        request.multipart(form)
    }

    fn parse_response(&self, body: &str) -> UploadResult {
        let parsed: FormTokenResponse = serde_json::from_str(body)
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        let succeeded = parsed.result.as_deref() == Some("success") && parsed.code == Some(200);
        if !succeeded {
            return Err(UploadError::ProviderRejected {
                message: parsed
                    .message
                    .unwrap_or_else(|| UNKNOWN_PROVIDER_ERROR.to_string()),
            });
        }

        parsed
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| UploadError::MalformedResponse("success without url".to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bearer provider
// ─────────────────────────────────────────────────────────────────────────────

/// Token sent as `Authorization: Bearer`; body `{"url"}` on success
#[derive(Debug, Clone)]
pub struct BearerProtocol {
    file_field: String,
}

impl BearerProtocol {
    /// Default multipart field holding the file
    pub const DEFAULT_FILE_FIELD: &'static str = "file";
    /// Path appended to a bare base URL
    pub const UPLOAD_PATH: &'static str = "/api/upload";

    /// Create with an explicit file field name
    #[must_use]
    pub fn new(file_field: impl Into<String>) -> Self {
        Self {
            file_field: file_field.into(),
        }
    }
}

impl Default for BearerProtocol {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE_FIELD)
    }
}

#[derive(Debug, Deserialize)]
struct BearerResponse {
    url: Option<String>,
    message: Option<String>,
}

impl UploadProtocol for BearerProtocol {
    fn name(&self) -> &'static str {
        "bearer"
    }

    fn endpoint(&self, configured: &str) -> String {
        let base = configured.trim_end_matches('/');
        if base.ends_with(Self::UPLOAD_PATH) {
            base.to_string()
        } else {
            format!("{base}{}", Self::UPLOAD_PATH)
        }
    }

    fn authorize(&self, request: RequestBuilder, file: Part, token: &str) -> RequestBuilder {
        let form = Form::new().part(self.file_field.clone(), file);
        request.bearer_auth(token).multipart(form)
    }

    fn parse_response(&self, body: &str) -> UploadResult {
        let parsed: BearerResponse = serde_json::from_str(body)
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        match parsed.url.filter(|url| !url.is_empty()) {
            Some(url) => Ok(url),
            None => Err(UploadError::ProviderRejected {
                message: parsed
                    .message
                    .unwrap_or_else(|| UNKNOWN_PROVIDER_ERROR.to_string()),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Provider variant selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Form token field, `result`/`code` success detection
    #[default]
    EasyImage,
    /// Bearer header, `url` success detection
    Bearer,
}

impl ProviderKind {
    /// Build the protocol, applying optional field-name overrides
    #[must_use]
    pub fn protocol(
        self,
        file_field: Option<&str>,
        token_field: Option<&str>,
    ) -> Arc<dyn UploadProtocol> {
        match self {
            Self::EasyImage => Arc::new(FormTokenProtocol::new(
                file_field.unwrap_or(FormTokenProtocol::DEFAULT_FILE_FIELD),
                token_field.unwrap_or(FormTokenProtocol::DEFAULT_TOKEN_FIELD),
            )),
            Self::Bearer => Arc::new(BearerProtocol::new(
                file_field.unwrap_or(BearerProtocol::DEFAULT_FILE_FIELD),
            )),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easyimage" | "easyimages" | "form" => Ok(Self::EasyImage),
            "bearer" => Ok(Self::Bearer),
            other => Err(format!(
                "unknown upload provider '{other}' (expected 'easyimage' or 'bearer')"
            )),
        }
    }
}
