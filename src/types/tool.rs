//! Tool and resource entities.

use serde::{Deserialize, Serialize};

use super::states::{ReadyState, ToolKind};

/// A tool attached to an agent. Must reach `ready` before the agent can
/// use it in a turn.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ToolKind,
    #[serde(default)]
    pub state: Option<ReadyState>,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

/// Request payload for creating a tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ToolKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl ToolConfig {
    pub fn new(name: impl Into<String>, kind: ToolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            config: None,
        }
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }
}

/// A content resource owned by a tool. `data` is base64-encoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub state: Option<ReadyState>,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

/// Request payload for creating a resource.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    pub name: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl NewResource {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: None,
        }
    }

    /// Attach binary content, base64-encoding it for the wire.
    pub fn with_content(mut self, content: &[u8]) -> Self {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine;
        self.data = Some(STANDARD.encode(content));
        self
    }
}
