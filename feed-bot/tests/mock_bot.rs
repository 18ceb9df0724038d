//! Recording Bot mock shared by integration tests.
//!
//! Captures every send and thread-open instead of talking to a chat platform;
//! admin verdicts and send failures are switchable per test.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use feed_bot::{Bot, BotError, Chat, Message, Result, User};

#[derive(Debug, Clone)]
pub struct SentRecord {
    pub chat_id: i64,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ThreadRecord {
    pub chat_id: i64,
    pub message_id: String,
    pub title: String,
}

pub struct RecordingBot {
    pub messages: Mutex<Vec<SentRecord>>,
    pub threads: Mutex<Vec<ThreadRecord>>,
    pub admin: AtomicBool,
    pub fail_sends: AtomicBool,
    next_id: AtomicI32,
}

impl RecordingBot {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            threads: Mutex::new(Vec::new()),
            admin: AtomicBool::new(true),
            fail_sends: AtomicBool::new(false),
            next_id: AtomicI32::new(1),
        }
    }

    pub async fn sent_texts(&self) -> Vec<String> {
        self.messages
            .lock()
            .await
            .iter()
            .map(|record| record.text.clone())
            .collect()
    }

    fn check_send(&self) -> Result<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(BotError::Bot("send failed (mock)".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.check_send()?;
        self.messages.lock().await.push(SentRecord {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String> {
        self.send_message(chat, text).await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(id.to_string())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn open_thread(
        &self,
        chat: &Chat,
        message_id: &str,
        title: &str,
        _auto_archive: Duration,
    ) -> Result<()> {
        self.threads.lock().await.push(ThreadRecord {
            chat_id: chat.id,
            message_id: message_id.to_string(),
            title: title.to_string(),
        });
        Ok(())
    }

    async fn is_admin(&self, _chat: &Chat, _user: &User) -> Result<bool> {
        Ok(self.admin.load(Ordering::SeqCst))
    }
}
