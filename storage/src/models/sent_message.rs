//! Dedup-ledger row of the `sent_messages` table.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A posted feed entry. The identifier is the entry link; presence of a row
/// means "already posted, do not repost". Rows are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SentMessage {
    pub identifier: String,
    pub timestamp: NaiveDateTime,
}
