//! Agent entity and request payloads.

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::states::{OutputFormat, ReadyState};

/// An agent as returned by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub agent_type: Option<String>,
    #[serde(default)]
    pub safety_check: bool,
    #[serde(default)]
    pub expert_in: String,
    #[serde(default)]
    pub initial_instructions: String,
    #[serde(default)]
    pub iterations: Option<u32>,
    #[serde(default)]
    pub base_model: Option<String>,
    #[serde(default)]
    pub advanced_model: Option<String>,
    #[serde(default)]
    pub default_output_format: Option<OutputFormat>,
    #[serde(default)]
    pub default_output_format_options: Option<String>,
    #[serde(default)]
    pub preprocessing_enabled: Option<bool>,
    #[serde(default)]
    pub postprocessing_enabled: Option<bool>,
    /// Absent on services that report agents as immediately usable.
    #[serde(default)]
    pub state: Option<ReadyState>,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Configuration for creating an agent.
#[derive(Debug, Clone, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    #[builder(into)]
    pub name: String,
    #[serde(rename = "type")]
    #[builder(into, default = "smart".to_string())]
    pub agent_type: String,
    #[builder(default)]
    pub safety_check: bool,
    #[builder(into, default)]
    pub expert_in: String,
    #[builder(into, default)]
    pub initial_instructions: String,
    #[builder(default = 20)]
    pub iterations: u32,
    #[builder(into, default = "OpenAiGpt4oMini".to_string())]
    pub base_model: String,
    #[builder(into, default = "OpenAiGpt4o".to_string())]
    pub advanced_model: String,
    #[builder(default)]
    pub default_output_format: OutputFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_output_format_options: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orchestration_module_config: Option<serde_json::Value>,
}

/// Partial update for an existing agent. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct AgentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub expert_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub initial_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub base_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub advanced_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_output_format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub default_output_format_options: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprocessing_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postprocessing_enabled: Option<bool>,
}
