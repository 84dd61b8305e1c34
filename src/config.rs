//! Configuration and settings management
//!
//! Settings are read from optional `config/*` files and the environment, then
//! validated once at startup. Required values that are absent or empty are
//! reported by their environment variable name.

use crate::auth::AllowList;
use crate::upload::{ProviderKind, UploadProtocol};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Values as they arrive from the configuration sources
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    telegram_bot_token: Option<String>,
    upload_api_url: Option<String>,
    easy_images_api_url: Option<String>,
    upload_api_key: Option<String>,
    easy_images_api_key: Option<String>,
    allowed_users: Option<String>,
    upload_provider: Option<String>,
    upload_file_field: Option<String>,
    upload_token_field: Option<String>,
}

/// Validated application settings
#[derive(Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_token: String,
    /// Upload endpoint as configured
    pub upload_url: String,
    /// Credential sent to the image host
    pub upload_api_key: String,
    /// Users permitted to upload; empty means open mode
    pub allowed_users: AllowList,
    /// Request/response shape of the image host
    pub provider: ProviderKind,
    /// Override for the multipart file field name
    pub upload_file_field: Option<String>,
    /// Override for the multipart token field name
    pub upload_token_field: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String, ConfigError> {
    non_empty(value)
        .ok_or_else(|| ConfigError::Message(format!("{name} is required but not set")))
}

impl Settings {
    /// Load settings from files and the environment
    ///
    /// ```no_run
    /// use imglink_bot::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a source cannot be read or validation fails.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Local overrides, not checked into git
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            // UPPER_SNAKE_CASE variables map to snake_case keys; empty means unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        Self::from_config(config)
    }

    /// Validate an already built [`Config`]
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first missing or invalid value.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let raw: RawSettings = config.try_deserialize()?;

        let telegram_token = required(raw.telegram_bot_token, "TELEGRAM_BOT_TOKEN")?;
        let upload_url = required(
            non_empty(raw.upload_api_url).or(raw.easy_images_api_url),
            "UPLOAD_API_URL",
        )?;
        let upload_api_key = required(
            non_empty(raw.upload_api_key).or(raw.easy_images_api_key),
            "UPLOAD_API_KEY",
        )?;

        if !(upload_url.starts_with("http://") || upload_url.starts_with("https://")) {
            return Err(ConfigError::Message(format!(
                "UPLOAD_API_URL must be an http(s) URL, got '{upload_url}'"
            )));
        }

        let provider = match non_empty(raw.upload_provider) {
            Some(name) => name
                .parse::<ProviderKind>()
                .map_err(|e| ConfigError::Message(format!("UPLOAD_PROVIDER: {e}")))?,
            None => ProviderKind::default(),
        };

        Ok(Self {
            telegram_token,
            upload_url,
            upload_api_key,
            allowed_users: AllowList::parse(raw.allowed_users.as_deref()),
            provider,
            upload_file_field: non_empty(raw.upload_file_field),
            upload_token_field: non_empty(raw.upload_token_field),
        })
    }

    /// Protocol matching the configured provider and field overrides
    #[must_use]
    pub fn upload_protocol(&self) -> Arc<dyn UploadProtocol> {
        self.provider.protocol(
            self.upload_file_field.as_deref(),
            self.upload_token_field.as_deref(),
        )
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("telegram_token", &"[MASKED]")
            .field("upload_url", &self.upload_url)
            .field("upload_api_key", &"[MASKED]")
            .field("allowed_users", &self.allowed_users.len())
            .field("provider", &self.provider)
            .field("upload_file_field", &self.upload_file_field)
            .field("upload_token_field", &self.upload_token_field)
            .finish()
    }
}
