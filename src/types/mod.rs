//! Wire data model for the Agent Service API.
//!
//! Server-observed states (chat state, entry type, readiness) are closed
//! tagged enums so the orchestrator's dispatch stays exhaustive; each one
//! keeps an `Unknown` catch-all because the service adds states over time.

pub mod agent;
pub mod callback;
pub mod chat;
pub mod history;
pub mod states;
pub mod tool;

pub use agent::{Agent, AgentConfig, AgentUpdate};
pub use callback::CallbackEvent;
pub use chat::{Chat, NewChat};
pub use history::HistoryEntry;
pub use states::{ChatState, EntryType, OutputFormat, ReadyState, Role, ToolKind};
pub use tool::{NewResource, Resource, Tool, ToolConfig};
