//! Derived setup state: recomputed from the store on demand, never cached.

use serde::{Deserialize, Serialize};

use super::config_entry::ConfigEntry;

/// Poll period used when `refresh_interval` has never been configured.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 500;

const KEY_SETUP_COMPLETED: &str = "setup_completed";
const KEY_CHANNEL_ID: &str = "channel_id";
const KEY_REFRESH_INTERVAL: &str = "refresh_interval";

/// Snapshot of the bot's configuration, derived from `bot_config` + `rss_feeds`.
///
/// `channel_id` is `None` whenever the bot is unconfigured or the stored value
/// is missing or unparseable; callers gate sends on the option instead of a
/// placeholder id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupState {
    pub configured: bool,
    pub channel_id: Option<i64>,
    pub refresh_interval: u64,
    pub feeds: Vec<String>,
}

impl SetupState {
    /// Derives the state from raw `bot_config` rows and the subscribed feed urls.
    ///
    /// `configured` is true iff `setup_completed` holds exactly `"True"`; any
    /// other value, including case variants, counts as false.
    pub fn from_rows(config: &[ConfigEntry], feeds: Vec<String>) -> Self {
        let lookup = |key: &str| {
            config
                .iter()
                .find(|entry| entry.key == key)
                .map(|entry| entry.value.as_str())
        };

        let configured = lookup(KEY_SETUP_COMPLETED) == Some("True");

        let channel_id = if configured {
            lookup(KEY_CHANNEL_ID).and_then(|v| v.parse::<i64>().ok())
        } else {
            None
        };

        let refresh_interval = lookup(KEY_REFRESH_INTERVAL)
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);

        Self {
            configured,
            channel_id,
            refresh_interval,
            feeds,
        }
    }

    /// Channel to post into, present only when setup completed with a valid id.
    pub fn target_channel(&self) -> Option<i64> {
        if self.configured {
            self.channel_id
        } else {
            None
        }
    }
}
