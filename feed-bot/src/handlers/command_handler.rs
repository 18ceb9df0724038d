//! Handler that parses administrative commands and runs them on the service.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::commands::{Command, CommandError};
use crate::core::{Bot, BotError, Handler, HandlerResponse, Message, Result};
use crate::service::FeedBotService;

/// Parses `/command` text, executes it on [`FeedBotService`], and replies with
/// the result. Non-command and unknown text falls through with `Continue`.
pub struct CommandHandler {
    service: Arc<FeedBotService>,
    bot: Arc<dyn Bot>,
    bot_username: Arc<RwLock<Option<String>>>,
}

impl CommandHandler {
    pub fn new(
        service: Arc<FeedBotService>,
        bot: Arc<dyn Bot>,
        bot_username: Arc<RwLock<Option<String>>>,
    ) -> Self {
        Self {
            service,
            bot,
            bot_username,
        }
    }
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let username = self.bot_username.read().await.clone();
        let Some(command) = Command::parse(&message.content, username.as_deref()) else {
            return Ok(HandlerResponse::Continue);
        };

        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            command = command.name(),
            "Executing command"
        );

        match self.service.execute(command).await {
            Ok(reply) => {
                self.bot.reply_to(message, &reply.text).await?;

                if reply.refresh_after {
                    let outcome = self.service.refresh().await.map_err(BotError::from)?;
                    info!(
                        posted = outcome.posted,
                        failed_feeds = outcome.failures.len(),
                        "Post-command refresh pass finished"
                    );
                }

                Ok(HandlerResponse::Reply(reply.text))
            }
            Err(err) => match err.user_reply() {
                Some(text) => {
                    warn!(
                        user_id = message.user.id,
                        reply = %text,
                        "Command rejected"
                    );
                    self.bot.reply_to(message, &text).await?;
                    Ok(HandlerResponse::Reply(text))
                }
                None => {
                    error!(error = %err, "Command failed on storage");
                    match err {
                        CommandError::Storage(e) => Err(BotError::from(e)),
                        other => Err(BotError::Bot(other.to_string())),
                    }
                }
            },
        }
    }
}
