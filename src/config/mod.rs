//! Configuration model for devagents.
//!
//! This module defines the Config struct that represents the YAML file passed
//! with `--config`: the engine that serves models, the project goal, and the
//! agent roster with each agent's model, system prompt and tool schema.
//! Unknown fields are ignored; the loaded config is validated once and then
//! treated as an immutable snapshot.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::{Config, PROJECT_MANAGER};
pub use types::{AgentConfig, ToolSpec};
