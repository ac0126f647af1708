//! Status transitions.

use super::{Task, TaskStatus};
use crate::error::{DevAgentsError, Result};
use chrono::Utc;

impl Task {
    /// Move the task to `next`, refreshing `updated_at`.
    ///
    /// Transitions outside the state machine are rejected and leave the task
    /// untouched.
    pub fn transition(&mut self, next: TaskStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(DevAgentsError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}
