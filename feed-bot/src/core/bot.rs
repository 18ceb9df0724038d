//! Transport-agnostic Bot trait.
//!
//! The core never talks to the chat platform directly; production wires a
//! Telegram implementation, tests substitute a recording mock.

use std::time::Duration;

use async_trait::async_trait;

use super::error::Result;
use super::types::{Chat, Message, User};

/// Chat-platform operations the core needs: send, thread, reply, admin check.
#[async_trait]
pub trait Bot: Send + Sync {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;

    /// Sends a message and returns its platform id, for anchoring a thread.
    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String>;

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;

    /// Opens a discussion thread on an already-sent message. `auto_archive` is
    /// a hint; transports without thread archival ignore it.
    async fn open_thread(
        &self,
        chat: &Chat,
        message_id: &str,
        title: &str,
        auto_archive: Duration,
    ) -> Result<()>;

    /// Whether the user may run administrative commands in this chat.
    async fn is_admin(&self, chat: &Chat, user: &User) -> Result<bool>;
}
