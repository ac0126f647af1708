//! Insertion-ordered, in-memory task store.
//!
//! The store is a cheap cloneable handle over one mutex-guarded list. The
//! scheduler loop, the `assign-task` tool and the host program all hold a
//! handle. The lock is only taken for short, synchronous sections and is
//! never held across an `.await`.

use super::{Task, TaskStatus};
use crate::error::{DevAgentsError, Result};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle to the task list.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Arc<Mutex<Vec<Task>>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Task>> {
        // Mutations never leave a task half-written, so a poisoned list is still valid.
        self.tasks.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    /// Append a new pending task and return a snapshot of it.
    pub fn add_task(
        &self,
        description: impl Into<String>,
        assigned_to: impl Into<String>,
    ) -> Task {
        let task = Task::new(description, assigned_to);

        tracing::info!(
            task_id = %task.id,
            assigned_to = %task.assigned_to,
            description = %task.description,
            "adding task"
        );

        self.lock().push(task.clone());
        task
    }

    /// Snapshot of the task with the given id.
    pub fn get_task(&self, id: &str) -> Option<Task> {
        self.lock().iter().find(|t| t.id == id).cloned()
    }

    /// Snapshot of every task, in insertion order.
    pub fn list_tasks(&self) -> Vec<Task> {
        self.lock().clone()
    }

    /// Snapshot of the tasks assigned to `assignee`, in insertion order.
    pub fn list_tasks_by_assignee(&self, assignee: &str) -> Vec<Task> {
        self.lock()
            .iter()
            .filter(|t| t.assigned_to == assignee)
            .cloned()
            .collect()
    }

    /// Whether any task is currently in progress.
    pub fn has_in_progress(&self) -> bool {
        self.lock()
            .iter()
            .any(|t| t.status == TaskStatus::InProgress)
    }

    /// Atomically pick the first pending task and mark it in progress.
    ///
    /// Returns `None` when a task is already in progress or nothing is
    /// pending. The check and the transition happen under one lock.
    pub fn start_next_pending(&self) -> Option<Task> {
        let mut tasks = self.lock();

        if tasks.iter().any(|t| t.status == TaskStatus::InProgress) {
            return None;
        }

        let task = tasks.iter_mut().find(|t| t.status == TaskStatus::Pending)?;
        task.transition(TaskStatus::InProgress).ok()?;
        Some(task.clone())
    }

    /// Move a task to `status`.
    pub fn update_status(&self, id: &str, status: TaskStatus) -> Result<Task> {
        let mut tasks = self.lock();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DevAgentsError::TaskNotFound(id.to_string()))?;

        task.transition(status)?;

        tracing::debug!(task_id = %task.id, status = %status, "task status updated");
        Ok(task.clone())
    }

    /// Number of tasks in each status, as `(pending, in_progress, completed, failed)`.
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        self.lock()
            .iter()
            .fold((0, 0, 0, 0), |(p, i, c, f), t| match t.status {
                TaskStatus::Pending => (p + 1, i, c, f),
                TaskStatus::InProgress => (p, i + 1, c, f),
                TaskStatus::Completed => (p, i, c + 1, f),
                TaskStatus::Failed => (p, i, c, f + 1),
            })
    }
}
