//! Command, message and callback handlers

use super::media::{extract_content, TelegramFetcher};
use super::views::keyboard;
use crate::formats::Surface;
use crate::workflow::{Sender, Workflow};
use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands, ApiError, RequestError};
use tracing::{debug, info, warn};

/// Supported commands for the bot
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Show the welcome message
    #[command(description = "Start the bot.")]
    Start,
    /// Show usage help
    #[command(description = "Show usage help.")]
    Help,
}

fn get_user_name(msg: &Message) -> String {
    if let Some(ref user) = msg.from {
        if !user.first_name.is_empty() {
            return user.first_name.clone();
        }
        if let Some(ref username) = user.username {
            return username.clone();
        }
    }
    "there".to_string()
}

/// Safe extraction of user ID from a message.
/// Returns 0 if the user information is missing.
#[must_use]
pub fn get_user_id_safe(msg: &Message) -> i64 {
    msg.from.as_ref().map_or(0, |u| u.id.0.cast_signed())
}

fn sender_of(msg: &Message) -> Sender {
    Sender {
        user_id: get_user_id_safe(msg),
        display_name: get_user_name(msg),
    }
}

async fn send_surface(bot: &Bot, chat_id: ChatId, surface: &Surface) -> Result<()> {
    let mut req = bot.send_message(chat_id, surface.text.clone());
    if let Some(markup) = keyboard(surface) {
        req = req.reply_markup(markup);
    }
    req.await?;
    Ok(())
}

/// Handle `/start` and `/help`
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    workflow: Arc<Workflow>,
) -> Result<()> {
    let sender = sender_of(&msg);
    let surface = match cmd {
        Command::Start => {
            info!(user_id = sender.user_id, "User started the bot");
            workflow.greet(&sender)
        }
        Command::Help => {
            let help = workflow.help();
            Surface::text(format!("{}\n\n{}", help.text, Command::descriptions()))
        }
    };
    send_surface(&bot, msg.chat.id, &surface).await
}

/// Handle any non-command message
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn handle_message(bot: Bot, msg: Message, workflow: Arc<Workflow>) -> Result<()> {
    let sender = sender_of(&msg);
    let content = extract_content(&msg);
    let fetcher = TelegramFetcher::new(bot.clone());

    let reply = workflow.handle_content(&sender, &content, &fetcher).await;
    send_surface(&bot, msg.chat.id, &reply).await
}

/// Handle an inline button press by editing the menu message in place
///
/// # Errors
///
/// Returns an error if the menu message cannot be edited.
pub async fn handle_callback(bot: Bot, q: CallbackQuery, workflow: Arc<Workflow>) -> Result<()> {
    // Stops the client spinner whatever the payload
    let _ = bot.answer_callback_query(q.id.clone()).await;

    let Some(data) = q.data.as_deref() else {
        debug!("Callback without data");
        return Ok(());
    };

    let sender = Sender {
        user_id: q.from.id.0.cast_signed(),
        display_name: q.from.first_name.clone(),
    };
    let Some(surface) = workflow.handle_selection(&sender, data).await else {
        return Ok(());
    };

    let Some(message) = q.message.as_ref() else {
        warn!(user_id = sender.user_id, "Callback without an attached message");
        return Ok(());
    };

    let mut req = bot.edit_message_text(message.chat().id, message.id(), surface.text.clone());
    if let Some(markup) = keyboard(&surface) {
        req = req.reply_markup(markup);
    }

    match req.await {
        Ok(_) => Ok(()),
        Err(RequestError::Api(ApiError::MessageNotModified)) => {
            debug!(user_id = sender.user_id, "Menu already shows this view");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AllowList;
    use crate::upload::MockImageUploader;
    use mockito::Matcher;
    use serde_json::json;

    fn bot_for(server: &mockito::ServerGuard) -> Bot {
        Bot::new("123456789:test-token").set_api_url(reqwest::Url::parse(&server.url()).unwrap())
    }

    fn workflow() -> Arc<Workflow> {
        Arc::new(Workflow::new(
            AllowList::default(),
            Arc::new(MockImageUploader::new()),
            "tok",
        ))
    }

    fn callback(extra: serde_json::Value) -> CallbackQuery {
        let mut value = json!({
            "id": "cb-1",
            "from": {"id": 42, "is_bot": false, "first_name": "Alice"},
            "chat_instance": "ci"
        });
        if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(value).unwrap()
    }

    async fn answer_mock(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", Matcher::Regex("(?i)answercallbackquery".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true,"result":true}"#)
            .expect(1)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_callback_without_data_is_answered() {
        let mut server = mockito::Server::new_async().await;
        let answered = answer_mock(&mut server).await;

        handle_callback(bot_for(&server), callback(json!({})), workflow())
            .await
            .unwrap();

        answered.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_callback_data_is_answered() {
        let mut server = mockito::Server::new_async().await;
        let answered = answer_mock(&mut server).await;

        handle_callback(
            bot_for(&server),
            callback(json!({"data": "retry_no_loop"})),
            workflow(),
        )
        .await
        .unwrap();

        answered.assert_async().await;
    }
}
