//! Chat entity and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::states::ChatState;

/// A conversation scoped to one agent. The state is authoritative on the
/// server and only ever observed here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: Option<ChatState>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Chat {
    /// Whether the server has marked this chat as failed.
    pub fn has_failed(&self) -> bool {
        self.state == Some(ChatState::Failed)
    }
}

/// Request payload for creating a chat.
#[derive(Debug, Clone, Serialize)]
pub struct NewChat {
    pub name: String,
}

impl NewChat {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
