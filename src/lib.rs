#![deny(missing_docs)]
//! Imglink bot library.
//!
//! Receives images over Telegram, pushes them to a self-hosted image host and
//! hands back the resulting link as a direct URL, HTML, BBCode or Markdown.

/// Allow-list authorization.
pub mod auth;
/// Telegram transport (dispatcher, handlers, views).
pub mod bot;
/// Configuration management.
pub mod config;
/// Workflow error taxonomy.
pub mod error;
/// Link format derivation and menu rendering.
pub mod formats;
/// Logging setup with secret redaction.
pub mod logging;
/// Per-user format session store.
pub mod session;
/// Image hosting upload client.
pub mod upload;
/// Transport-independent upload-and-present workflow.
pub mod workflow;
