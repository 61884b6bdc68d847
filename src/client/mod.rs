//! High-level service client: agents, tools, resources, chats, history.

mod documents;

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::auth::TokenProvider;
use crate::chat::ChatHandle;
use crate::config::{CredentialStore, Credentials};
use crate::error::Result;
use crate::poll::{await_ready, PollConfig};
use crate::transport::{collection, Transport};
use crate::types::{
    Agent, AgentConfig, AgentUpdate, Chat, HistoryEntry, NewChat, NewResource, ReadyState,
    Resource, Tool, ToolConfig,
};

/// Client for the Agent Service API. Cheap to clone; all clones share one
/// transport and token cache.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<Transport>,
}

// Creation responses carry just the new entity id.
#[derive(Deserialize)]
struct CreatedRef {
    #[serde(rename = "ID")]
    id: String,
}

impl Client {
    pub fn new(credentials: Credentials) -> Self {
        let tokens = TokenProvider::new(
            credentials.auth_url,
            credentials.client_id,
            credentials.client_secret,
        );
        Self {
            transport: Arc::new(Transport::new(credentials.api_url, tokens)),
        }
    }

    /// Build a client by resolving credentials through the fallback chain
    /// (explicit path → cached path → environment → interactive prompt).
    pub fn resolve(credentials_path: Option<&Path>) -> Result<Self> {
        let store = CredentialStore::default_location();
        let credentials = Credentials::resolve(credentials_path, &store)?;
        Ok(Self::new(credentials))
    }

    // --- Agents ---------------------------------------------------------

    pub async fn list_agents(&self) -> Result<Vec<Agent>> {
        collection(self.transport.get("/Agents").await?)
    }

    pub async fn get_agent(&self, agent_id: &str) -> Result<Agent> {
        let payload = self.transport.get(&format!("/Agents({agent_id})")).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Create an agent, or update the existing agent with the same name.
    pub async fn create_agent(&self, config: &AgentConfig) -> Result<Agent> {
        let existing = self
            .list_agents()
            .await?
            .into_iter()
            .find(|a| a.name == config.name);

        let agent_id = match existing {
            Some(agent) => {
                tracing::info!(name = %config.name, id = %agent.id, "agent exists, updating");
                self.transport
                    .patch(
                        &format!("/Agents({})", agent.id),
                        serde_json::to_value(config)?,
                    )
                    .await?;
                agent.id
            }
            None => {
                let payload = self
                    .transport
                    .post("/Agents", serde_json::to_value(config)?)
                    .await?;
                let created: CreatedRef = serde_json::from_value(payload)?;
                tracing::info!(name = %config.name, id = %created.id, "agent created");
                created.id
            }
        };

        self.get_agent(&agent_id).await
    }

    pub async fn update_agent(&self, agent_id: &str, update: &AgentUpdate) -> Result<Agent> {
        self.transport
            .patch(&format!("/Agents({agent_id})"), serde_json::to_value(update)?)
            .await?;
        self.get_agent(agent_id).await
    }

    pub async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        self.transport.delete(&format!("/Agents({agent_id})")).await
    }

    /// Wait until the agent reports ready. Agents without a state field are
    /// treated as immediately usable.
    pub async fn wait_agent_ready(&self, agent_id: &str, poll: PollConfig) -> Result<Agent> {
        await_ready(
            poll,
            || self.get_agent(agent_id),
            |agent: &Agent| matches!(agent.state, None | Some(ReadyState::Ready)),
            |agent| {
                (agent.state == Some(ReadyState::Error)).then(|| {
                    agent
                        .last_error
                        .clone()
                        .unwrap_or_else(|| format!("agent '{}' entered error state", agent.name))
                })
            },
        )
        .await
    }

    // --- Tools ----------------------------------------------------------

    pub async fn list_tools(&self, agent_id: &str) -> Result<Vec<Tool>> {
        collection(self.transport.get(&format!("/Agents({agent_id})/tools")).await?)
    }

    pub async fn get_tool(&self, agent_id: &str, tool_id: &str) -> Result<Tool> {
        let payload = self
            .transport
            .get(&format!("/Agents({agent_id})/tools({tool_id})"))
            .await?;
        Ok(serde_json::from_value(payload)?)
    }

    pub async fn create_tool(&self, agent_id: &str, config: &ToolConfig) -> Result<Tool> {
        let payload = self
            .transport
            .post(
                &format!("/Agents({agent_id})/tools"),
                serde_json::to_value(config)?,
            )
            .await?;
        let created: CreatedRef = serde_json::from_value(payload)?;
        self.get_tool(agent_id, &created.id).await
    }

    pub async fn delete_tool(&self, agent_id: &str, tool_id: &str) -> Result<()> {
        self.transport
            .delete(&format!("/Agents({agent_id})/tools({tool_id})"))
            .await
    }

    pub async fn wait_tool_ready(
        &self,
        agent_id: &str,
        tool_id: &str,
        poll: PollConfig,
    ) -> Result<Tool> {
        await_ready(
            poll,
            || self.get_tool(agent_id, tool_id),
            |tool: &Tool| tool.state == Some(ReadyState::Ready),
            |tool| {
                (tool.state == Some(ReadyState::Error)).then(|| {
                    tool.last_error
                        .clone()
                        .unwrap_or_else(|| format!("tool '{}' entered error state", tool.name))
                })
            },
        )
        .await
    }

    // --- Resources ------------------------------------------------------

    pub async fn list_resources(&self, agent_id: &str, tool_id: &str) -> Result<Vec<Resource>> {
        collection(
            self.transport
                .get(&format!("/Agents({agent_id})/tools({tool_id})/resources"))
                .await?,
        )
    }

    pub async fn get_resource(
        &self,
        agent_id: &str,
        tool_id: &str,
        resource_id: &str,
    ) -> Result<Resource> {
        let payload = self
            .transport
            .get(&format!(
                "/Agents({agent_id})/tools({tool_id})/resources({resource_id})"
            ))
            .await?;
        Ok(serde_json::from_value(payload)?)
    }

    pub async fn create_resource(
        &self,
        agent_id: &str,
        tool_id: &str,
        resource: &NewResource,
    ) -> Result<Resource> {
        let payload = self
            .transport
            .post(
                &format!("/Agents({agent_id})/tools({tool_id})/resources"),
                serde_json::to_value(resource)?,
            )
            .await?;
        let created: CreatedRef = serde_json::from_value(payload)?;
        self.get_resource(agent_id, tool_id, &created.id).await
    }

    pub async fn delete_resource(
        &self,
        agent_id: &str,
        tool_id: &str,
        resource_id: &str,
    ) -> Result<()> {
        self.transport
            .delete(&format!(
                "/Agents({agent_id})/tools({tool_id})/resources({resource_id})"
            ))
            .await
    }

    pub async fn wait_resource_ready(
        &self,
        agent_id: &str,
        tool_id: &str,
        resource_id: &str,
        poll: PollConfig,
    ) -> Result<Resource> {
        await_ready(
            poll,
            || self.get_resource(agent_id, tool_id, resource_id),
            |resource: &Resource| resource.state == Some(ReadyState::Ready),
            |resource| {
                (resource.state == Some(ReadyState::Error)).then(|| {
                    resource.last_error.clone().unwrap_or_else(|| {
                        format!("resource '{}' entered error state", resource.name)
                    })
                })
            },
        )
        .await
    }

    // --- Chats ----------------------------------------------------------

    pub async fn list_chats(&self, agent_id: &str) -> Result<Vec<Chat>> {
        collection(self.transport.get(&format!("/Agents({agent_id})/chats")).await?)
    }

    pub async fn get_chat(&self, agent_id: &str, chat_id: &str) -> Result<Chat> {
        let payload = self
            .transport
            .get(&format!("/Agents({agent_id})/chats({chat_id})"))
            .await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Create a chat, or return the existing chat with the same name.
    pub async fn create_chat(&self, agent_id: &str, name: &str) -> Result<Chat> {
        if let Some(chat) = self
            .list_chats(agent_id)
            .await?
            .into_iter()
            .find(|c| c.name == name)
        {
            tracing::info!(name, id = %chat.id, "chat exists, reusing");
            return Ok(chat);
        }

        let payload = self
            .transport
            .post(
                &format!("/Agents({agent_id})/chats"),
                serde_json::to_value(NewChat::named(name))?,
            )
            .await?;
        let created: CreatedRef = serde_json::from_value(payload)?;
        self.get_chat(agent_id, &created.id).await
    }

    /// Create a chat with a uuid-suffixed name that cannot collide.
    pub async fn create_unique_chat(&self, agent_id: &str, prefix: &str) -> Result<Chat> {
        let name = format!("{prefix}-{}", uuid::Uuid::new_v4());
        let payload = self
            .transport
            .post(
                &format!("/Agents({agent_id})/chats"),
                serde_json::to_value(NewChat::named(name))?,
            )
            .await?;
        let created: CreatedRef = serde_json::from_value(payload)?;
        self.get_chat(agent_id, &created.id).await
    }

    /// A handle for driving the conversation in one chat.
    pub fn chat(&self, agent_id: &str, chat_id: &str) -> ChatHandle {
        ChatHandle::new(self.clone(), agent_id, chat_id)
    }

    // --- History --------------------------------------------------------

    pub async fn list_history(&self, agent_id: &str, chat_id: &str) -> Result<Vec<HistoryEntry>> {
        collection(
            self.transport
                .get(&format!("/Agents({agent_id})/chats({chat_id})/history"))
                .await?,
        )
    }

    pub async fn get_history_entry(
        &self,
        agent_id: &str,
        chat_id: &str,
        entry_id: &str,
    ) -> Result<HistoryEntry> {
        let payload = self
            .transport
            .get(&format!(
                "/Agents({agent_id})/chats({chat_id})/history({entry_id})"
            ))
            .await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Entries whose `previous_id` is the given history id. Empty while the
    /// turn is still processing.
    pub async fn replies_to(
        &self,
        agent_id: &str,
        chat_id: &str,
        history_id: &str,
    ) -> Result<Vec<HistoryEntry>> {
        collection(
            self.transport
                .get_with_query(
                    &format!("/Agents({agent_id})/chats({chat_id})/history"),
                    &[("$filter", format!("previous/ID eq {history_id}"))],
                )
                .await?,
        )
    }

    // --- Turn operations (used by ChatHandle) ---------------------------

    pub(crate) async fn post_message(
        &self,
        agent_id: &str,
        chat_id: &str,
        action: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value> {
        self.transport
            .post(&format!("/Agents({agent_id})/chats({chat_id})/{action}"), body)
            .await
    }

    pub(crate) async fn cancel_chat(&self, agent_id: &str, chat_id: &str) -> Result<()> {
        self.post_message(agent_id, chat_id, "cancel", json!({})).await?;
        Ok(())
    }
}
