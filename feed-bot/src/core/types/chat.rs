//! Chat identity type for core messages.

use serde::{Deserialize, Serialize};

/// Chat (channel, group or private) identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

impl Chat {
    /// Target channel the refresher posts into; the transport only needs the id.
    pub fn channel(id: i64) -> Self {
        Self {
            id,
            chat_type: "channel".to_string(),
        }
    }

    pub fn is_private(&self) -> bool {
        self.chat_type == "private"
    }
}
