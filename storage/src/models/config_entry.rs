//! Key/value row of the `bot_config` table.

use serde::{Deserialize, Serialize};

/// A single configuration entry. Values are stored as strings; typed reads
/// happen in [`crate::SetupState`].
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}
