//! Configuration repository: bot config, feed subscriptions, dedup ledger.
//!
//! Owns the SqlitePoolManager and the three tables (`bot_config`, `rss_feeds`,
//! `sent_messages`). Every mutation commits immediately; only `complete_setup`
//! groups its related writes in one transaction so no half-configured state is
//! ever observable.

use tracing::info;

use crate::error::StorageError;
use crate::models::{ConfigEntry, SentMessage, SetupState};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct ConfigRepository {
    pool_manager: SqlitePoolManager,
}

impl ConfigRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sent_messages (
                identifier TEXT PRIMARY KEY,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS rss_feeds (
                url TEXT PRIMARY KEY
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bot_config (
                key TEXT PRIMARY KEY,
                value TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Reads a single config value.
    pub async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM bot_config WHERE key = ?")
                .bind(key)
                .fetch_optional(self.pool_manager.pool())
                .await?;
        Ok(row.map(|(v,)| v))
    }

    /// Upserts a single config value.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT OR REPLACE INTO bot_config (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    /// Adds a feed subscription; inserting an already-subscribed url is a no-op.
    pub async fn add_feed(&self, url: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT OR IGNORE INTO rss_feeds (url) VALUES (?)")
            .bind(url)
            .execute(self.pool_manager.pool())
            .await?;
        info!(url = %url, "Feed subscription added");
        Ok(())
    }

    /// Removes a feed subscription. Returns false when the url was not subscribed.
    pub async fn remove_feed(&self, url: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM rss_feeds WHERE url = ?")
            .bind(url)
            .execute(self.pool_manager.pool())
            .await?;
        let removed = result.rows_affected() > 0;
        if removed {
            info!(url = %url, "Feed subscription removed");
        }
        Ok(removed)
    }

    /// Lists subscribed feed urls in insertion order.
    pub async fn list_feeds(&self) -> Result<Vec<String>, StorageError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT url FROM rss_feeds ORDER BY rowid")
            .fetch_all(self.pool_manager.pool())
            .await?;
        Ok(rows.into_iter().map(|(url,)| url).collect())
    }

    /// Checks the dedup ledger for an entry identifier.
    pub async fn is_sent(&self, identifier: &str) -> Result<bool, StorageError> {
        Ok(self.sent_record(identifier).await?.is_some())
    }

    /// Reads one dedup-ledger row with its creation timestamp.
    pub async fn sent_record(
        &self,
        identifier: &str,
    ) -> Result<Option<SentMessage>, StorageError> {
        let row = sqlx::query_as::<_, SentMessage>(
            "SELECT identifier, timestamp FROM sent_messages WHERE identifier = ?",
        )
        .bind(identifier)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(row)
    }

    /// Records an entry identifier as posted. Idempotent; commits immediately so
    /// a crash after a successful post always reflects a durable sent-record.
    pub async fn mark_sent(&self, identifier: &str) -> Result<(), StorageError> {
        sqlx::query("INSERT OR IGNORE INTO sent_messages (identifier) VALUES (?)")
            .bind(identifier)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    /// Dumps all raw config entries ordered by key.
    pub async fn list_config(&self) -> Result<Vec<ConfigEntry>, StorageError> {
        let rows = sqlx::query_as::<_, ConfigEntry>(
            "SELECT key, value FROM bot_config ORDER BY key",
        )
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(rows)
    }

    /// Derives [`SetupState`] in one read transaction: one scan of `bot_config`
    /// plus one scan of `rss_feeds`, never observing a mid-mutation mix.
    pub async fn setup_state(&self) -> Result<SetupState, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        let config = sqlx::query_as::<_, ConfigEntry>("SELECT key, value FROM bot_config")
            .fetch_all(&mut *tx)
            .await?;
        let feeds: Vec<(String,)> = sqlx::query_as("SELECT url FROM rss_feeds ORDER BY rowid")
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(SetupState::from_rows(
            &config,
            feeds.into_iter().map(|(url,)| url).collect(),
        ))
    }

    /// One-time setup: persists the channel id, the `setup_completed` flag, and
    /// the first feed subscription in a single transaction.
    pub async fn complete_setup(&self, channel_id: i64, url: &str) -> Result<(), StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        sqlx::query("INSERT OR REPLACE INTO bot_config (key, value) VALUES ('channel_id', ?)")
            .bind(channel_id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT OR REPLACE INTO bot_config (key, value) VALUES ('setup_completed', 'True')",
        )
        .execute(&mut *tx)
        .await?;
        sqlx::query("INSERT OR IGNORE INTO rss_feeds (url) VALUES (?)")
            .bind(url)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(channel_id = channel_id, url = %url, "Setup completed");
        Ok(())
    }

    /// Releases the store handle.
    pub async fn close(&self) {
        self.pool_manager.close().await;
    }
}
