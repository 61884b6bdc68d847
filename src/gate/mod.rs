//! Tool/resource readiness gate.
//!
//! Run before a chat's first send: confirms everything the agent depends
//! on is ready, failing fast with the aggregated reasons instead of
//! letting the server reject the message with an opaque error. Advisory —
//! the server remains authoritative.

use futures::future::try_join_all;

use crate::client::Client;
use crate::error::{ColloquyError, Result};
use crate::poll::PollConfig;
use crate::types::{ReadyState, Resource, Tool};

/// Verifies every tool and resource attached to an agent is ready.
#[derive(Debug, Clone, Copy)]
pub struct ReadinessGate {
    poll: PollConfig,
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self {
            poll: PollConfig::gate_default(),
        }
    }
}

impl ReadinessGate {
    pub fn new(poll: PollConfig) -> Self {
        Self { poll }
    }

    /// Check every tool and every resource of `agent_id`.
    ///
    /// Anything already in an error state fails the gate immediately with
    /// all reasons aggregated; items still uploading/processing are polled
    /// to readiness concurrently (each poll fails fast on its own error
    /// state).
    pub async fn ensure_agent_ready(&self, client: &Client, agent_id: &str) -> Result<()> {
        let tools = client.list_tools(agent_id).await?;

        let mut failures: Vec<String> = Vec::new();
        let mut pending_tools: Vec<String> = Vec::new();
        let mut pending_resources: Vec<(String, String)> = Vec::new();

        for tool in &tools {
            match tool.state {
                Some(ReadyState::Error) => failures.push(tool_failure(tool)),
                Some(ReadyState::Ready) | None => {}
                Some(_) => pending_tools.push(tool.id.clone()),
            }

            for resource in client.list_resources(agent_id, &tool.id).await? {
                match resource.state {
                    Some(ReadyState::Error) => failures.push(resource_failure(tool, &resource)),
                    Some(ReadyState::Ready) | None => {}
                    Some(_) => pending_resources.push((tool.id.clone(), resource.id)),
                }
            }
        }

        if !failures.is_empty() {
            tracing::warn!(agent_id, failures = failures.len(), "readiness gate failed");
            return Err(ColloquyError::not_ready(failures.join("; ")));
        }

        try_join_all(
            pending_tools
                .iter()
                .map(|tool_id| client.wait_tool_ready(agent_id, tool_id, self.poll)),
        )
        .await?;
        try_join_all(pending_resources.iter().map(|(tool_id, resource_id)| {
            client.wait_resource_ready(agent_id, tool_id, resource_id, self.poll)
        }))
        .await?;

        tracing::debug!(agent_id, tools = tools.len(), "readiness gate passed");
        Ok(())
    }
}

fn tool_failure(tool: &Tool) -> String {
    match &tool.last_error {
        Some(reason) => format!("tool '{}': {reason}", tool.name),
        None => format!("tool '{}' is in error state", tool.name),
    }
}

fn resource_failure(tool: &Tool, resource: &Resource) -> String {
    match &resource.last_error {
        Some(reason) => format!("resource '{}' of tool '{}': {reason}", resource.name, tool.name),
        None => format!(
            "resource '{}' of tool '{}' is in error state",
            resource.name, tool.name
        ),
    }
}
