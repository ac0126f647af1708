//! Task model for devagents.
//!
//! A task is a unit of work handed to one agent. Tasks live in memory only,
//! in the insertion-ordered [`TaskStore`], and move through a small state
//! machine:
//!
//! ```text
//! pending ──> in_progress ──> completed
//!                        └──> failed
//! ```
//!
//! `completed` and `failed` are terminal; there is no preemption or retry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

mod mutations;
mod store;

pub use store::TaskStore;

/// Opaque task identifier (UUID v4 string).
pub type TaskId = String;

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::InProgress)
                | (TaskStatus::InProgress, TaskStatus::Completed)
                | (TaskStatus::InProgress, TaskStatus::Failed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A unit of work assigned to an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, never reused.
    pub id: TaskId,

    /// Instruction passed verbatim to the agent as its user turn.
    pub description: String,

    /// Name of the agent that executes the task.
    pub assigned_to: String,

    /// Current lifecycle status.
    pub status: TaskStatus,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Refreshed on every status transition.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new pending task with a fresh id.
    pub fn new(description: impl Into<String>, assigned_to: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            assigned_to: assigned_to.into(),
            status: TaskStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
