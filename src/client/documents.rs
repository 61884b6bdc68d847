//! Document conveniences layered over the document tool.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{ColloquyError, Result};
use crate::poll::PollConfig;
use crate::types::{NewResource, Resource, Tool, ToolConfig, ToolKind};

use super::Client;

impl Client {
    /// Upload a document, creating the document tool first if the agent
    /// has none, and wait until the service has processed it.
    pub async fn add_document(
        &self,
        agent_id: &str,
        name: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<Resource> {
        let tool = self.document_tool(agent_id).await?;
        let resource = self
            .create_resource(
                agent_id,
                &tool.id,
                &NewResource::new(name, content_type).with_content(content),
            )
            .await?;
        tracing::info!(name, resource_id = %resource.id, "document submitted, waiting");
        self.wait_resource_ready(agent_id, &tool.id, &resource.id, PollConfig::gate_default())
            .await
    }

    /// All documents attached to the agent's document tool. Empty when the
    /// agent has no document tool.
    pub async fn list_documents(&self, agent_id: &str) -> Result<Vec<Resource>> {
        match self.find_document_tool(agent_id).await? {
            Some(tool) => self.list_resources(agent_id, &tool.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Fetch and decode a document's content by name. `None` when the
    /// document (or the document tool) does not exist.
    pub async fn document_content(&self, agent_id: &str, name: &str) -> Result<Option<Vec<u8>>> {
        let Some(tool) = self.find_document_tool(agent_id).await? else {
            return Ok(None);
        };
        let Some(found) = self
            .list_resources(agent_id, &tool.id)
            .await?
            .into_iter()
            .find(|r| r.name == name)
        else {
            return Ok(None);
        };

        let resource = self.get_resource(agent_id, &tool.id, &found.id).await?;
        let Some(data) = resource.data else {
            return Ok(None);
        };
        let decoded = STANDARD.decode(data.as_bytes()).map_err(|e| {
            ColloquyError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("resource '{name}' is not valid base64: {e}"),
            ))
        })?;
        Ok(Some(decoded))
    }

    /// Delete a document by name. Returns whether anything was removed.
    pub async fn remove_document(&self, agent_id: &str, name: &str) -> Result<bool> {
        let Some(tool) = self.find_document_tool(agent_id).await? else {
            return Ok(false);
        };
        let Some(found) = self
            .list_resources(agent_id, &tool.id)
            .await?
            .into_iter()
            .find(|r| r.name == name)
        else {
            return Ok(false);
        };
        self.delete_resource(agent_id, &tool.id, &found.id).await?;
        tracing::info!(name, resource_id = %found.id, "document removed");
        Ok(true)
    }

    async fn find_document_tool(&self, agent_id: &str) -> Result<Option<Tool>> {
        Ok(self
            .list_tools(agent_id)
            .await?
            .into_iter()
            .find(|t| t.kind == ToolKind::Document))
    }

    async fn document_tool(&self, agent_id: &str) -> Result<Tool> {
        if let Some(tool) = self.find_document_tool(agent_id).await? {
            return Ok(tool);
        }
        tracing::info!(agent_id, "no document tool, creating one");
        let tool = self
            .create_tool(agent_id, &ToolConfig::new("document", ToolKind::Document))
            .await?;
        self.wait_tool_ready(agent_id, &tool.id, PollConfig::gate_default())
            .await
    }
}
