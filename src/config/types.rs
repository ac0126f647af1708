//! Agent and tool schema types used by the config.
//!
//! Tool specs follow the JSON-schema function format that model servers
//! accept for function calling, so they can be forwarded as-is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Definition of one agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name; tasks are assigned by this name.
    pub name: String,

    /// Model identifier passed to the serving engine.
    #[serde(default)]
    pub model: String,

    /// System prompt seeded as the first history message.
    #[serde(default)]
    pub prompt: String,

    /// Tools the model may call.
    #[serde(default)]
    pub tools: Vec<ToolSpec>,
}

impl AgentConfig {
    /// Names of the functions this agent may call.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter_map(|t| t.function.as_ref())
            .map(|f| f.name.as_str())
            .collect()
    }
}

/// A tool offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool type; only "function" is supported.
    #[serde(rename = "type", default = "default_tool_type")]
    pub kind: String,

    /// Function description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionSpec>,
}

fn default_tool_type() -> String {
    "function".to_string()
}

/// Function signature of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub parameters: ParametersSpec,
}

/// JSON-schema object describing the function parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametersSpec {
    #[serde(rename = "type", default = "default_parameters_type")]
    pub kind: String,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,
}

impl Default for ParametersSpec {
    fn default() -> Self {
        Self {
            kind: default_parameters_type(),
            required: Vec::new(),
            properties: BTreeMap::new(),
        }
    }
}

fn default_parameters_type() -> String {
    "object".to_string()
}

/// A single parameter property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<serde_json::Value>,

    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<serde_json::Value>,
}
