//! REPL runner: converts teloxide messages to core messages and passes them to
//! the HandlerChain. Fatal (database) handler errors are forwarded to the
//! shutdown channel instead of being swallowed.

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use crate::chain::HandlerChain;
use crate::core::{BotError, ToCoreMessage};

use super::adapters::TelegramMessageWrapper;

/// Starts the REPL with the given teloxide Bot and HandlerChain.
///
/// Calls get_me() before starting and caches the username (used to strip
/// `/cmd@botname` addressing); each message is converted to a core message and
/// handled in a spawned task so the REPL stays responsive.
#[instrument(skip(bot, handler_chain, bot_username, shutdown_tx))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
    shutdown_tx: mpsc::Sender<BotError>,
) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            *bot_username.write().await = Some(username.clone());
            info!(username = %username, "Bot username cached before repl");
        }
    }

    let chain = handler_chain;
    teloxide::repl(
        bot,
        move |_bot: Bot, msg: teloxide::types::Message| {
            let chain = chain.clone();
            let shutdown_tx = shutdown_tx.clone();

            async move {
                let wrapper = TelegramMessageWrapper(&msg);
                let core_msg = wrapper.to_core();

                if let Some(text) = msg.text() {
                    info!(
                        user_id = core_msg.user.id,
                        chat_id = core_msg.chat.id,
                        message_content = %text,
                        "Received message"
                    );
                }

                // Run the chain in a spawned task so the REPL returns immediately.
                tokio::spawn(async move {
                    if let Err(e) = chain.handle(&core_msg).await {
                        error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
                        if e.is_fatal() {
                            let _ = shutdown_tx.send(e).await;
                        }
                    }
                });

                Ok(())
            }
        },
    )
    .await;

    Ok(())
}
