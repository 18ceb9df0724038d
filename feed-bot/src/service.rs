//! Command execution service.
//!
//! The explicit context object behind the command surface: owns the
//! repository, the refresher, and the scheduler's period handle, so no state
//! hides in module globals. Each command re-resolves the setup state before
//! acting.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, instrument};

use storage::{ConfigRepository, StorageError};

use crate::commands::{Command, CommandError};
use crate::refresher::{FeedRefresher, RefreshOutcome};

const SETUP_USAGE: &str = "/setup <channel_id> <rss_url>";
const ADD_FEED_USAGE: &str = "/add_feed <rss_url>";
const REMOVE_FEED_USAGE: &str = "/remove_feed <rss_url>";
const INTERVAL_USAGE: &str = "/set_refresh_interval <seconds>";

/// Successful command result: the chat reply, plus whether a refresh pass
/// should follow once the reply is out (setup and add_feed trigger one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub text: String,
    pub refresh_after: bool,
}

impl CommandReply {
    fn text(text: String) -> Self {
        Self {
            text,
            refresh_after: false,
        }
    }

    fn then_refresh(text: String) -> Self {
        Self {
            text,
            refresh_after: true,
        }
    }
}

pub struct FeedBotService {
    repo: Arc<ConfigRepository>,
    refresher: Arc<FeedRefresher>,
    period_tx: watch::Sender<Duration>,
}

impl FeedBotService {
    pub fn new(
        repo: Arc<ConfigRepository>,
        refresher: Arc<FeedRefresher>,
        period_tx: watch::Sender<Duration>,
    ) -> Self {
        Self {
            repo,
            refresher,
            period_tx,
        }
    }

    /// Runs one refresh pass (used for the post-reply trigger of setup and
    /// add_feed).
    pub async fn refresh(&self) -> Result<RefreshOutcome, StorageError> {
        self.refresher.refresh().await
    }

    /// Executes one command and produces the reply for the invoking user.
    #[instrument(skip(self, command), fields(command = command.name()))]
    pub async fn execute(&self, command: Command) -> Result<CommandReply, CommandError> {
        match command {
            Command::Setup {
                channel_id,
                feed_url,
            } => self.setup(channel_id, feed_url).await,
            Command::Refresh => self.manual_refresh().await,
            Command::AddFeed { url } => self.add_feed(url).await,
            Command::RemoveFeed { url } => self.remove_feed(url).await,
            Command::ListFeeds => self.list_feeds().await,
            Command::PrintConfig => self.print_config().await,
            Command::SetRefreshInterval { seconds } => self.set_refresh_interval(seconds).await,
        }
    }

    async fn setup(
        &self,
        channel_id: Option<i64>,
        feed_url: Option<String>,
    ) -> Result<CommandReply, CommandError> {
        let state = self.repo.setup_state().await?;
        if state.configured {
            return Err(CommandError::AlreadyConfigured);
        }

        let (channel_id, feed_url) = match (channel_id, feed_url) {
            (Some(channel_id), Some(feed_url)) => (channel_id, feed_url),
            _ => {
                return Err(CommandError::MissingArguments { usage: SETUP_USAGE });
            }
        };

        self.repo.complete_setup(channel_id, &feed_url).await?;

        Ok(CommandReply::then_refresh(format!(
            "Setup completed! Channel ID set to {} and first RSS feed added: {}",
            channel_id, feed_url
        )))
    }

    async fn manual_refresh(&self) -> Result<CommandReply, CommandError> {
        let outcome = self.refresher.refresh().await?;

        let mut text = format!(
            "Manually refreshed RSS feeds. {} new entries posted.",
            outcome.posted
        );
        for (url, error) in &outcome.failures {
            text.push_str(&format!("\nFailed: {} ({})", url, error));
        }
        Ok(CommandReply::text(text))
    }

    async fn add_feed(&self, url: Option<String>) -> Result<CommandReply, CommandError> {
        let state = self.repo.setup_state().await?;
        if !state.configured {
            return Err(CommandError::NotConfigured);
        }
        let Some(url) = url else {
            return Err(CommandError::MissingArguments {
                usage: ADD_FEED_USAGE,
            });
        };

        self.repo.add_feed(&url).await?;

        Ok(CommandReply::then_refresh(format!(
            "Added new RSS feed: {}",
            url
        )))
    }

    async fn remove_feed(&self, url: Option<String>) -> Result<CommandReply, CommandError> {
        let state = self.repo.setup_state().await?;
        if !state.configured {
            return Err(CommandError::NotConfigured);
        }
        let Some(url) = url else {
            return Err(CommandError::MissingArguments {
                usage: REMOVE_FEED_USAGE,
            });
        };

        if !self.repo.remove_feed(&url).await? {
            return Err(CommandError::UnknownFeed(url));
        }

        // Removal does not trigger a refresh: there is nothing new to post.
        Ok(CommandReply::text(format!("Removed RSS feed: {}", url)))
    }

    async fn list_feeds(&self) -> Result<CommandReply, CommandError> {
        let state = self.repo.setup_state().await?;
        if !state.configured {
            return Err(CommandError::NotConfigured);
        }

        if state.feeds.is_empty() {
            return Ok(CommandReply::text("No feeds added yet.".to_string()));
        }
        Ok(CommandReply::text(format!(
            "List of RSS feeds:\n{}",
            state.feeds.join("\n")
        )))
    }

    async fn print_config(&self) -> Result<CommandReply, CommandError> {
        let state = self.repo.setup_state().await?;
        if !state.configured {
            return Err(CommandError::NotConfigured);
        }

        let config = self.repo.list_config().await?;
        if config.is_empty() {
            return Ok(CommandReply::text(
                "No values found in bot_config.".to_string(),
            ));
        }

        let listing = config
            .iter()
            .map(|entry| format!("{}: {}", entry.key, entry.value))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(CommandReply::text(format!(
            "Values from bot_config:\n{}",
            listing
        )))
    }

    async fn set_refresh_interval(
        &self,
        seconds: Option<i64>,
    ) -> Result<CommandReply, CommandError> {
        let Some(seconds) = seconds else {
            return Err(CommandError::MissingArguments {
                usage: INTERVAL_USAGE,
            });
        };
        if seconds <= 0 {
            return Err(CommandError::InvalidInterval(seconds));
        }

        self.repo
            .set("refresh_interval", &seconds.to_string())
            .await?;
        self.period_tx
            .send_replace(Duration::from_secs(seconds as u64));

        info!(seconds = seconds, "Refresh interval updated");
        Ok(CommandReply::text(format!(
            "Refresh interval set to {} seconds.",
            seconds
        )))
    }
}
