//! Wraps teloxide::Bot and implements [`crate::core::Bot`]. Production code
//! sends messages via Telegram; tests substitute another Bot impl.

use std::time::Duration;

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, MessageId, ReplyParameters, UserId},
};

use crate::core::{Bot as CoreBot, BotError, Chat, Message, Result, User};

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        let sent = self
            .bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(sent.id.to_string())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    /// Telegram has no thread archival, so the auto-archive hint is dropped;
    /// the discussion is anchored as a titled reply to the posted message.
    async fn open_thread(
        &self,
        chat: &Chat,
        message_id: &str,
        title: &str,
        _auto_archive: Duration,
    ) -> Result<()> {
        let id: i32 = message_id.parse().map_err(|_| {
            BotError::Bot(format!("Invalid message_id for thread: {}", message_id))
        })?;
        self.bot
            .send_message(ChatId(chat.id), title.to_string())
            .reply_parameters(ReplyParameters::new(MessageId(id)))
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn is_admin(&self, chat: &Chat, user: &User) -> Result<bool> {
        // A private chat has no administrator list; the invoking user owns it.
        if chat.is_private() {
            return Ok(true);
        }

        let Ok(user_id) = u64::try_from(user.id) else {
            return Ok(false);
        };

        let admins = self
            .bot
            .get_chat_administrators(ChatId(chat.id))
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(admins.iter().any(|member| member.user.id == UserId(user_id)))
    }
}
