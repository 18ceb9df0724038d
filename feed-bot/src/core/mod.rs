//! Core types and traits: Handler, Bot, Message, error, logger.
//! Transport-agnostic; the Telegram layer adapts onto these.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use types::{Chat, Handler, HandlerResponse, Message, ToCoreMessage, ToCoreUser, User};
