//! Progress-callback payload for callers hosting a destination endpoint.
//!
//! The service can push per-step updates to a configured destination.
//! Delivery is best-effort; the SDK's polling path never depends on it.

use serde::Deserialize;

use super::states::EntryType;

/// One pushed progress update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackEvent {
    #[serde(default)]
    pub tenant_id: Option<String>,
    pub agent_id: String,
    pub chat_id: String,
    #[serde(default)]
    pub history_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub agent_message: Option<String>,
    #[serde(default)]
    pub response_history_id: Option<String>,
}

impl CallbackEvent {
    /// The human-readable payload, whichever field the service used.
    pub fn message(&self) -> Option<&str> {
        self.msg.as_deref().or(self.agent_message.as_deref())
    }
}
