//! Core types: user, chat, message, handler response, and Handler trait.
//!
//! One file per main type, matching project conventions.

mod chat;
mod handler;
mod message;
mod response;
mod user;

pub use chat::Chat;
pub use handler::{Handler, ToCoreMessage, ToCoreUser};
pub use message::Message;
pub use response::HandlerResponse;
pub use user::User;
