//! History entries: the append-only conversation record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::states::{EntryType, Role};

/// One immutable record in a chat's history. Entries chain backwards via
/// `previous_id` to the entry they answer.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub entry_type: Option<EntryType>,
    pub previous_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    /// Whether this entry ends the turn it answers.
    pub fn ends_turn(&self) -> bool {
        self.entry_type.is_some_and(EntryType::ends_turn)
    }
}

// The service encodes the predecessor either as a nested `previous` object
// or a flat `previous_ID`, and the author as `role` or `sender`.
#[derive(Deserialize)]
struct WireEntry {
    #[serde(rename = "ID")]
    id: String,
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    sender: Option<Role>,
    #[serde(default)]
    content: String,
    #[serde(rename = "type", default)]
    entry_type: Option<EntryType>,
    #[serde(default)]
    previous: Option<PreviousRef>,
    #[serde(rename = "previous_ID", default)]
    previous_id: Option<String>,
    #[serde(rename = "createdAt", default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct PreviousRef {
    #[serde(rename = "ID")]
    id: String,
}

impl<'de> Deserialize<'de> for HistoryEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = WireEntry::deserialize(deserializer)?;
        Ok(Self {
            id: wire.id,
            role: wire.role.or(wire.sender).unwrap_or(Role::User),
            content: wire.content,
            entry_type: wire.entry_type,
            previous_id: wire.previous.map(|p| p.id).or(wire.previous_id),
            created_at: wire.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_nested_previous_reference() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "ID": "h2",
            "role": "assistant",
            "content": "4",
            "type": "answerForUser",
            "previous": { "ID": "h1" }
        }))
        .unwrap();
        assert_eq!(entry.previous_id.as_deref(), Some("h1"));
        assert_eq!(entry.entry_type, Some(EntryType::AnswerForUser));
        assert!(entry.ends_turn());
    }

    #[test]
    fn parses_flat_previous_id() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "ID": "h2",
            "sender": "ai",
            "content": "Which city?",
            "type": "questionForUser",
            "previous_ID": "h1"
        }))
        .unwrap();
        assert_eq!(entry.previous_id.as_deref(), Some("h1"));
        assert_eq!(entry.role, Role::Ai);
    }

    #[test]
    fn missing_role_defaults_to_user() {
        let entry: HistoryEntry =
            serde_json::from_value(json!({ "ID": "h1", "content": "2+2?" })).unwrap();
        assert_eq!(entry.role, Role::User);
        assert_eq!(entry.entry_type, None);
        assert!(!entry.ends_turn());
    }

    #[test]
    fn unknown_type_tag_does_not_end_turn() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "ID": "h3",
            "role": "assistant",
            "content": "…",
            "type": "telemetryPing"
        }))
        .unwrap();
        assert_eq!(entry.entry_type, Some(EntryType::Unknown));
        assert!(!entry.ends_turn());
    }
}
