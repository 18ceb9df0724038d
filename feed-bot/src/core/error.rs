//! Error types for the bot core.

use thiserror::Error;

/// Top-level error for the bot.
///
/// Database errors are fatal: the process cannot run without the store, so
/// they propagate to shutdown instead of being retried. Transport errors are
/// per-operation and recoverable.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Bot error: {0}")]
    Bot(String),
}

impl From<storage::StorageError> for BotError {
    fn from(e: storage::StorageError) -> Self {
        BotError::Database(e.to_string())
    }
}

impl BotError {
    /// True for store-unavailable failures that must terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BotError::Database(_))
    }
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
