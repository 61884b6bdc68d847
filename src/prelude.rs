//! Convenience re-exports for common use.

pub use crate::chat::{
    ChatHandle, InterruptionKind, PendingInterruption, SendOptions, TurnOutcome,
};
pub use crate::client::Client;
pub use crate::config::{CredentialStore, Credentials};
pub use crate::error::{ColloquyError, Result};
pub use crate::poll::PollConfig;
pub use crate::types::{
    Agent, AgentConfig, AgentUpdate, Chat, ChatState, EntryType, HistoryEntry, NewResource,
    OutputFormat, ReadyState, Resource, Role, Tool, ToolConfig, ToolKind,
};
