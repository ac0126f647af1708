//! Agent lookup by name.
//!
//! Tasks name their agent in `assigned_to`; the registry resolves that name
//! to the session that executes the task.

use super::Chat;
use crate::error::{DevAgentsError, Result};
use std::collections::BTreeMap;

/// Agent sessions keyed by name.
#[derive(Default)]
pub struct AgentRegistry {
    agents: BTreeMap<String, Box<dyn Chat>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under its own name, replacing any previous one.
    pub fn insert(&mut self, agent: Box<dyn Chat>) {
        self.agents.insert(agent.name().to_string(), agent);
    }

    /// Resolve the agent a task is assigned to.
    ///
    /// # Errors
    ///
    /// `AgentNotFound` when no agent with that name is registered.
    pub fn resolve(&mut self, name: &str) -> Result<&mut Box<dyn Chat>> {
        if !self.agents.contains_key(name) {
            tracing::warn!(
                agent = %name,
                available = %self.available(),
                "task assigned to unknown agent"
            );
            return Err(DevAgentsError::AgentNotFound(name.to_string()));
        }

        self.agents
            .get_mut(name)
            .ok_or_else(|| DevAgentsError::AgentNotFound(name.to_string()))
    }

    /// Registered agent names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.agents.keys().map(String::as_str).collect()
    }

    fn available(&self) -> String {
        if self.agents.is_empty() {
            "(none)".to_string()
        } else {
            self.names().join(", ")
        }
    }
}

impl FromIterator<Box<dyn Chat>> for AgentRegistry {
    fn from_iter<I: IntoIterator<Item = Box<dyn Chat>>>(iter: I) -> Self {
        let mut registry = Self::new();
        for agent in iter {
            registry.insert(agent);
        }
        registry
    }
}
