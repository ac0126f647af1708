//! Config loading and validation.

use super::model::{Config, PROJECT_MANAGER};
use crate::error::{DevAgentsError, Result};
use crate::spawner::SUPPORTED_ENGINES;
use std::collections::HashSet;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(DevAgentsError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            DevAgentsError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| DevAgentsError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Validation rules:
    /// - `engine` must name a supported serving engine
    /// - at least one agent, and one of them must be the project manager
    /// - agent names must be non-empty and unique, models non-empty
    /// - every tool is a function with a name, and its `required`
    ///   parameters are declared in `properties`
    pub fn validate(&self) -> Result<()> {
        if self.engine.is_empty() {
            return Err(invalid("engine must be set"));
        }

        if !SUPPORTED_ENGINES.contains(&self.engine.as_str()) {
            return Err(invalid(format!(
                "unsupported engine '{}' (supported: {})",
                self.engine,
                SUPPORTED_ENGINES.join(", ")
            )));
        }

        if self.agents.is_empty() {
            return Err(invalid("at least one agent must be configured"));
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if agent.name.trim().is_empty() {
                return Err(invalid("agent name cannot be empty"));
            }

            if !seen.insert(agent.name.as_str()) {
                return Err(invalid(format!("duplicate agent name '{}'", agent.name)));
            }

            if agent.model.trim().is_empty() {
                return Err(invalid(format!("agent '{}' has no model", agent.name)));
            }

            for tool in &agent.tools {
                if tool.kind != "function" {
                    return Err(invalid(format!(
                        "agent '{}' has a tool of unsupported type '{}'",
                        agent.name, tool.kind
                    )));
                }

                let Some(function) = &tool.function else {
                    return Err(invalid(format!(
                        "agent '{}' has a tool without a function definition",
                        agent.name
                    )));
                };

                if function.name.is_empty() {
                    return Err(invalid(format!(
                        "agent '{}' has a tool with an empty function name",
                        agent.name
                    )));
                }

                if let Some(missing) = function
                    .parameters
                    .required
                    .iter()
                    .find(|r| !function.parameters.properties.contains_key(*r))
                {
                    return Err(invalid(format!(
                        "tool '{}' of agent '{}' requires undeclared parameter '{}'",
                        function.name, agent.name, missing
                    )));
                }
            }
        }

        if !seen.contains(PROJECT_MANAGER) {
            return Err(invalid(format!(
                "an agent named '{}' is required to receive the goal",
                PROJECT_MANAGER
            )));
        }

        Ok(())
    }
}

fn invalid(reason: impl std::fmt::Display) -> DevAgentsError {
    DevAgentsError::UserError(format!("config validation failed: {}", reason))
}
