//! Feed refresher: one pass over all subscribed feeds, posting unseen entries.
//!
//! Passes are serialized by an internal lock so a manual refresh and a
//! scheduled one can never interleave and double-post. A failing feed is
//! reported in the outcome and the pass continues with the next one; only
//! storage failures abort the pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use storage::{ConfigRepository, StorageError};

use crate::core::{Bot, Chat};
use crate::feed::{FeedClient, FeedEntry};

/// Entries considered per feed per pass, in the parser's natural order.
pub const MAX_ENTRIES_PER_FEED: usize = 5;

/// Requested auto-archive for per-entry discussion threads (60 minutes).
const THREAD_AUTO_ARCHIVE: Duration = Duration::from_secs(60 * 60);

/// What one refresh pass did: posts made plus per-feed failures (url, error).
#[derive(Debug, Default)]
pub struct RefreshOutcome {
    pub posted: usize,
    pub failures: Vec<(String, String)>,
}

pub struct FeedRefresher {
    repo: Arc<ConfigRepository>,
    bot: Arc<dyn Bot>,
    client: FeedClient,
    pass_lock: Mutex<()>,
}

impl FeedRefresher {
    pub fn new(repo: Arc<ConfigRepository>, bot: Arc<dyn Bot>, client: FeedClient) -> Self {
        Self {
            repo,
            bot,
            client,
            pass_lock: Mutex::new(()),
        }
    }

    /// Runs one refresh pass. No-op when the bot is not set up. At most one
    /// pass executes at a time; concurrent callers queue on the lock.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<RefreshOutcome, StorageError> {
        let _pass = self.pass_lock.lock().await;

        let state = self.repo.setup_state().await?;
        let Some(channel_id) = state.target_channel() else {
            info!("Refresh skipped: bot is not set up yet");
            return Ok(RefreshOutcome::default());
        };
        let channel = Chat::channel(channel_id);

        let mut outcome = RefreshOutcome::default();
        for url in &state.feeds {
            info!(url = %url, "Checking feed");
            match self.client.fetch(url).await {
                Ok(entries) => {
                    self.post_new_entries(&channel, url, &entries, &mut outcome)
                        .await?;
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Feed fetch failed, continuing with next feed");
                    outcome.failures.push((url.clone(), e.to_string()));
                }
            }
        }

        info!(
            posted = outcome.posted,
            failed_feeds = outcome.failures.len(),
            "Refreshing feeds: done"
        );
        Ok(outcome)
    }

    /// Posts the first [`MAX_ENTRIES_PER_FEED`] entries that are not yet in the
    /// dedup ledger. Each successful post is recorded and committed before the
    /// next entry is considered.
    async fn post_new_entries(
        &self,
        channel: &Chat,
        url: &str,
        entries: &[FeedEntry],
        outcome: &mut RefreshOutcome,
    ) -> Result<(), StorageError> {
        for entry in entries.iter().take(MAX_ENTRIES_PER_FEED) {
            if self.repo.is_sent(&entry.link).await? {
                continue;
            }

            match self.post_entry(channel, entry).await {
                Ok(()) => {
                    self.repo.mark_sent(&entry.link).await?;
                    outcome.posted += 1;
                }
                Err(e) => {
                    warn!(url = %url, link = %entry.link, error = %e, "Failed to post entry");
                    outcome.failures.push((url.to_string(), e.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Sends one entry and opens its discussion thread. A thread failure after
    /// a successful send is logged but does not fail the entry: the post is
    /// out, so it must still land in the ledger.
    async fn post_entry(&self, channel: &Chat, entry: &FeedEntry) -> crate::core::Result<()> {
        let content = format!("**{}**\n{}", entry.title, entry.link);
        let message_id = self
            .bot
            .send_message_and_return_id(channel, &content)
            .await?;

        if let Err(e) = self
            .bot
            .open_thread(channel, &message_id, &entry.title, THREAD_AUTO_ARCHIVE)
            .await
        {
            warn!(link = %entry.link, error = %e, "Failed to open discussion thread");
        }

        Ok(())
    }
}
