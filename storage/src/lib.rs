//! Storage crate: SQLite-backed bot configuration and dedup ledger.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – ConfigEntry, SentMessage, SetupState
//! - [`config_repo`] – ConfigRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod config_repo;
mod error;
mod models;
mod sqlite_pool;


pub use config_repo::ConfigRepository;
pub use error::StorageError;
pub use models::{ConfigEntry, SentMessage, SetupState, DEFAULT_REFRESH_INTERVAL_SECS};
pub use sqlite_pool::SqlitePoolManager;
