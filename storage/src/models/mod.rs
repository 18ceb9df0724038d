//! Storage models: config entries, sent-message records, derived setup state.
//!
//! One file per main type, matching project conventions.

mod config_entry;
mod sent_message;
mod setup_state;

pub use config_entry::ConfigEntry;
pub use sent_message::SentMessage;
pub use setup_state::{SetupState, DEFAULT_REFRESH_INTERVAL_SECS};
