//! Command surface: parsing of administrative chat commands and their
//! user-facing error taxonomy.

use thiserror::Error;

use storage::StorageError;

/// Administrative command, parsed from chat text (`/name args…`).
///
/// Argument slots stay optional so the service can answer with a usage line
/// instead of silently dropping a malformed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Setup {
        channel_id: Option<i64>,
        feed_url: Option<String>,
    },
    Refresh,
    AddFeed {
        url: Option<String>,
    },
    RemoveFeed {
        url: Option<String>,
    },
    ListFeeds,
    PrintConfig,
    SetRefreshInterval {
        seconds: Option<i64>,
    },
}

impl Command {
    /// Parses a chat message into a command. Returns `None` for non-command
    /// text, unknown commands, and commands addressed to a different bot
    /// (`/cmd@otherbot` in group chats).
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Command> {
        let mut words = text.split_whitespace();
        let head = words.next()?;
        let name = head.strip_prefix('/')?;

        let name = match name.split_once('@') {
            Some((name, addressee)) => {
                match bot_username {
                    Some(own) if addressee.eq_ignore_ascii_case(own) => name,
                    // Addressed to some other bot, or we do not know our own
                    // username yet: not ours.
                    _ => return None,
                }
            }
            None => name,
        };

        let command = match name {
            "setup" => Command::Setup {
                channel_id: words.next().and_then(|w| w.parse().ok()),
                feed_url: words.next().map(str::to_string),
            },
            "refresh" | "refresh_feeds" => Command::Refresh,
            "add_feed" => Command::AddFeed {
                url: words.next().map(str::to_string),
            },
            "remove_feed" => Command::RemoveFeed {
                url: words.next().map(str::to_string),
            },
            "list_feeds" | "list_feed" => Command::ListFeeds,
            "print_config" => Command::PrintConfig,
            "set_refresh_interval" => Command::SetRefreshInterval {
                seconds: words.next().and_then(|w| w.parse().ok()),
            },
            _ => return None,
        };
        Some(command)
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Setup { .. } => "setup",
            Command::Refresh => "refresh",
            Command::AddFeed { .. } => "add_feed",
            Command::RemoveFeed { .. } => "remove_feed",
            Command::ListFeeds => "list_feeds",
            Command::PrintConfig => "print_config",
            Command::SetRefreshInterval { .. } => "set_refresh_interval",
        }
    }
}

/// Command execution failure. Every variant except `Storage` renders as a chat
/// reply to the invoking user; `Storage` is fatal and propagates.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Setup already done, to reset the bot please delete the database file")]
    AlreadyConfigured,

    #[error("Please provide the necessary arguments:\n{usage}")]
    MissingArguments { usage: &'static str },

    #[error("Please complete the setup using the /setup command.")]
    NotConfigured,

    #[error("The provided RSS feed URL is not in the list.")]
    UnknownFeed(String),

    #[error("Please provide a positive value for the refresh interval.")]
    InvalidInterval(i64),

    #[error("Database error: {0}")]
    Storage(#[from] StorageError),
}

impl CommandError {
    /// Reply text for the invoking user, or `None` when the failure must not
    /// be swallowed into a chat message (store unavailable).
    pub fn user_reply(&self) -> Option<String> {
        match self {
            CommandError::Storage(_) => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: Plain text and unknown commands parse to None.**
    #[test]
    fn parse_ignores_non_commands() {
        assert_eq!(Command::parse("hello there", None), None);
        assert_eq!(Command::parse("/definitely_not_a_command", None), None);
        assert_eq!(Command::parse("", None), None);
    }

    /// **Test: setup parses both arguments; malformed channel id becomes None.**
    #[test]
    fn parse_setup_arguments() {
        assert_eq!(
            Command::parse("/setup 42 http://a/feed.xml", None),
            Some(Command::Setup {
                channel_id: Some(42),
                feed_url: Some("http://a/feed.xml".to_string()),
            })
        );
        assert_eq!(
            Command::parse("/setup forty-two http://a/feed.xml", None),
            Some(Command::Setup {
                channel_id: None,
                feed_url: Some("http://a/feed.xml".to_string()),
            })
        );
        assert_eq!(
            Command::parse("/setup", None),
            Some(Command::Setup {
                channel_id: None,
                feed_url: None,
            })
        );
    }

    /// **Test: @addressee suffix is honored — ours matches case-insensitively,
    /// other bots and unknown self are ignored.**
    #[test]
    fn parse_addressed_commands() {
        assert_eq!(
            Command::parse("/refresh@FeedBot", Some("feedbot")),
            Some(Command::Refresh)
        );
        assert_eq!(Command::parse("/refresh@otherbot", Some("feedbot")), None);
        assert_eq!(Command::parse("/refresh@feedbot", None), None);
        assert_eq!(Command::parse("/refresh", None), Some(Command::Refresh));
    }

    /// **Test: Command aliases map to the same commands.**
    #[test]
    fn parse_aliases() {
        assert_eq!(Command::parse("/refresh_feeds", None), Some(Command::Refresh));
        assert_eq!(Command::parse("/list_feed", None), Some(Command::ListFeeds));
        assert_eq!(Command::parse("/list_feeds", None), Some(Command::ListFeeds));
    }

    /// **Test: set_refresh_interval keeps negative values for validation.**
    #[test]
    fn parse_refresh_interval() {
        assert_eq!(
            Command::parse("/set_refresh_interval -5", None),
            Some(Command::SetRefreshInterval { seconds: Some(-5) })
        );
        assert_eq!(
            Command::parse("/set_refresh_interval soon", None),
            Some(Command::SetRefreshInterval { seconds: None })
        );
    }
}
