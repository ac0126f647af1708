//! Error types for devagents.
//!
//! Uses thiserror for derive macros. Subsystems carry their own error enums
//! (`ToolError`, `ChatError`, `SpawnError`); `DevAgentsError` wraps them with
//! the context the scheduler and the CLI need.

use crate::agent::ChatError;
use crate::exit_codes;
use crate::spawner::SpawnError;
use crate::task::TaskStatus;
use crate::tools::ToolError;
use thiserror::Error;

/// Main error type for devagents operations.
#[derive(Error, Debug)]
pub enum DevAgentsError {
    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// A task names an agent that is not registered.
    #[error("agent '{0}' not found")]
    AgentNotFound(String),

    /// An agent asked for a tool that is not registered.
    #[error("tool '{0}' not found")]
    ToolNotFound(String),

    /// A registered tool failed.
    #[error("tool '{tool}' failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },

    /// The chat turn with an agent failed.
    #[error("chat with agent '{agent}' failed: {source}")]
    Chat {
        agent: String,
        #[source]
        source: ChatError,
    },

    /// The model server could not be started.
    #[error("failed to start model server for agent '{agent}': {source}")]
    Spawn {
        agent: String,
        #[source]
        source: SpawnError,
    },

    /// A task id is not in the store.
    #[error("task '{0}' not found")]
    TaskNotFound(String),

    /// A status change that the task state machine does not allow.
    #[error("task '{id}' cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: TaskStatus,
        to: TaskStatus,
    },

    /// The scheduler halted because a task failed.
    #[error("task '{id}' failed: {reason}")]
    TaskFailed { id: String, reason: String },
}

impl DevAgentsError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DevAgentsError::UserError(_)
            | DevAgentsError::AgentNotFound(_)
            | DevAgentsError::ToolNotFound(_)
            | DevAgentsError::TaskNotFound(_)
            | DevAgentsError::InvalidTransition { .. } => exit_codes::USER_ERROR,
            DevAgentsError::Tool { .. } | DevAgentsError::TaskFailed { .. } => {
                exit_codes::TASK_FAILURE
            }
            DevAgentsError::Chat { .. } | DevAgentsError::Spawn { .. } => {
                exit_codes::MODEL_FAILURE
            }
        }
    }
}

/// Result type alias for devagents operations.
pub type Result<T> = std::result::Result<T, DevAgentsError>;
