//! Handler that gates commands on administrator rights and chat scope.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::core::{Bot, Handler, Message, Result};

/// Stops the chain in `before()` for commands issued by non-administrators or
/// outside the configured scope chat. Non-command messages pass through; the
/// command handler ignores them anyway.
pub struct AuthHandler {
    bot: Arc<dyn Bot>,
    scope_chat_id: Option<i64>,
}

impl AuthHandler {
    pub fn new(bot: Arc<dyn Bot>, scope_chat_id: Option<i64>) -> Self {
        Self { bot, scope_chat_id }
    }
}

#[async_trait]
impl Handler for AuthHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        if !message.content.starts_with('/') {
            return Ok(true);
        }

        if let Some(scope) = self.scope_chat_id {
            if message.chat.id != scope {
                info!(
                    chat_id = message.chat.id,
                    scope_chat_id = scope,
                    "Ignoring command outside the scope chat"
                );
                return Ok(false);
            }
        }

        match self.bot.is_admin(&message.chat, &message.user).await {
            Ok(true) => Ok(true),
            Ok(false) => {
                info!(
                    user_id = message.user.id,
                    chat_id = message.chat.id,
                    "Rejecting command from non-administrator"
                );
                self.bot
                    .reply_to(message, "This command requires administrator rights.")
                    .await?;
                Ok(false)
            }
            Err(e) => {
                // Cannot verify rights; deny rather than run the command.
                warn!(error = %e, chat_id = message.chat.id, "Administrator check failed");
                Ok(false)
            }
        }
    }
}
