//! Dispatcher wiring

use super::handlers::{self, Command};
use crate::workflow::Workflow;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{error, info};

/// Build the update tree: callbacks, commands, then everything else
#[must_use]
pub fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handle_callback))
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_command),
                )
                .branch(dptree::endpoint(handle_message)),
        )
}

/// Run the long-polling dispatcher until Ctrl+C
pub async fn run_bot(bot: Bot, workflow: Arc<Workflow>) {
    info!("Bot is running...");

    Dispatcher::builder(bot, setup_handler())
        .dependencies(dptree::deps![workflow])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    workflow: Arc<Workflow>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::handle_command(bot, msg, cmd, workflow).await {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    workflow: Arc<Workflow>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::handle_message(bot, msg, workflow).await {
        error!("Message handler error: {}", e);
    }
    respond(())
}

async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    workflow: Arc<Workflow>,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = handlers::handle_callback(bot, q, workflow).await {
        error!("Callback handler error: {}", e);
    }
    respond(())
}
