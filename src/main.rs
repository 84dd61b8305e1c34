use dotenvy::dotenv;
use imglink_bot::bot;
use imglink_bot::config::Settings;
use imglink_bot::logging::{init_logging, RedactionPatterns};
use imglink_bot::upload::HostingClient;
use imglink_bot::workflow::Workflow;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // Patterns must exist before the subscriber is installed
    let patterns = Arc::new(RedactionPatterns::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);
    init_logging(patterns);

    info!("Starting imglink bot...");

    let settings = init_settings();

    let uploader = Arc::new(HostingClient::new(
        &settings.upload_url,
        settings.upload_protocol(),
    ));
    info!(
        provider = ?settings.provider,
        endpoint = uploader.endpoint(),
        "Upload client initialized."
    );

    if settings.allowed_users.is_open() {
        info!("ALLOWED_USERS is empty; the bot is open to everyone.");
    } else {
        info!(count = settings.allowed_users.len(), "Allow-list loaded.");
    }

    let workflow = Arc::new(Workflow::new(
        settings.allowed_users.clone(),
        uploader,
        settings.upload_api_key.clone(),
    ));

    let bot = Bot::new(settings.telegram_token.clone());
    bot::run_bot(bot, workflow).await;

    Ok(())
}

fn init_settings() -> Settings {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}
