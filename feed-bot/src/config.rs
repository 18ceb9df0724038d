//! Bot configuration: Telegram connection, logging, database, chat scope.
//! Loaded from the environment (`.env` honored by the binary).

use std::env;

use anyhow::Result;

/// Runtime configuration for the bot process.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// DATABASE_URL (SQLite)
    pub database_url: String,
    /// LOG_FILE path
    pub log_file: String,
    /// SCOPE_CHAT_ID: when set, commands are only served in this chat
    pub scope_chat_id: Option<i64>,
}

impl BotConfig {
    /// Loads from environment variables. `token` overrides BOT_TOKEN when given.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:feed_bot.db".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/feed-bot.log".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let scope_chat_id = match env::var("SCOPE_CHAT_ID") {
            Ok(raw) => Some(raw.parse::<i64>().map_err(|_| {
                anyhow::anyhow!("SCOPE_CHAT_ID is set but not a chat id: {}", raw)
            })?),
            Err(_) => None,
        };

        Ok(Self {
            bot_token,
            telegram_api_url,
            database_url,
            log_file,
            scope_chat_id,
        })
    }

    /// Validates the config; call after load to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }
}
