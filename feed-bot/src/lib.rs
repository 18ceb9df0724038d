//! # RSS feed-watcher bot
//!
//! Polls subscribed RSS/Atom feeds and posts new entries into a configured
//! channel, deduplicating by entry link against a SQLite-backed ledger.
//! Core (types, Handler, Bot trait), chain, commands, service, refresher, and
//! scheduler are transport-agnostic; the telegram module adapts teloxide onto
//! them.

pub mod chain;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod core;
pub mod feed;
pub mod handlers;
pub mod refresher;
pub mod runner;
pub mod scheduler;
pub mod service;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};

pub use crate::core::{
    init_tracing, Bot, BotError, Chat, Handler, HandlerResponse, Message, Result, ToCoreMessage,
    ToCoreUser, User,
};

pub use chain::HandlerChain;
pub use commands::{Command, CommandError};
pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::BotConfig;
pub use feed::{FeedClient, FeedEntry, FetchError};
pub use handlers::{AuthHandler, CommandHandler};
pub use refresher::{FeedRefresher, RefreshOutcome, MAX_ENTRIES_PER_FEED};
pub use runner::{run_bot, FeedBot};
pub use scheduler::run_scheduler;
pub use service::{CommandReply, FeedBotService};
pub use telegram::{run_repl, TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper};
