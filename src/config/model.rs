//! Config struct definition.

use super::types::AgentConfig;
use serde::{Deserialize, Serialize};

/// Name of the agent that receives the project goal.
pub const PROJECT_MANAGER: &str = "project-manager";

/// Top-level configuration.
///
/// ```yaml
/// engine: ollama
/// goal: "Write a hello world program in Go"
/// agents:
///   - name: project-manager
///     model: llama3.1
///     prompt: "You are a project manager..."
///     tools: []
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Serving engine used to spawn a model server per agent (e.g. "ollama").
    #[serde(default)]
    pub engine: String,

    /// High-level goal handed to the project manager.
    #[serde(default)]
    pub goal: String,

    /// Agent roster, in declaration order.
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
}

impl Config {
    /// Iterate over agent names in declaration order.
    pub fn agent_names(&self) -> impl Iterator<Item = &str> {
        self.agents.iter().map(|a| a.name.as_str())
    }
}
