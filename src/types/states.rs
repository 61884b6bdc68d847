//! Closed server-state enums and their wire tags.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Chat lifecycle state reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatState {
    Active,
    Processing,
    Failed,
    Success,
    Running,
    None,
    #[serde(other)]
    Unknown,
}

/// Readiness state shared by agents, tools, and resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReadyState {
    Uploading,
    Processing,
    Ready,
    Error,
    #[serde(other)]
    Unknown,
}

/// Type tag of a history entry, driving the interruption protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum EntryType {
    Start,
    Agent,
    Tool,
    ToolResource,
    Abort,
    Error,
    AnswerForUser,
    QuestionForUser,
    QuestionForTool,
    QuestionForAgent,
    Event,
    #[serde(other)]
    Unknown,
}

impl EntryType {
    /// Whether an entry of this type ends a turn (with an answer, an
    /// interruption, or a failure). Progress updates keep the turn open.
    pub fn ends_turn(self) -> bool {
        matches!(
            self,
            Self::AnswerForUser
                | Self::QuestionForUser
                | Self::QuestionForTool
                | Self::Abort
                | Self::Error
        )
    }

    /// Whether this type interrupts the turn pending a continuation.
    pub fn is_interruption(self) -> bool {
        matches!(self, Self::QuestionForUser | Self::QuestionForTool)
    }
}

/// Author of a history entry. The service reports assistants as either
/// `assistant` or `ai` depending on the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Ai,
    #[serde(other)]
    Unknown,
}

/// Answer rendering requested from the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum OutputFormat {
    #[serde(rename = "JSON")]
    #[strum(serialize = "JSON")]
    Json,
    #[serde(rename = "Markdown")]
    #[strum(serialize = "Markdown")]
    Markdown,
    #[serde(rename = "Text")]
    #[strum(serialize = "Text")]
    Text,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Markdown
    }
}

/// Kind of tool attached to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToolKind {
    Document,
    Websearch,
    Human,
    Custom,
    #[serde(other)]
    Unknown,
}
