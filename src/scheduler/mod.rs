//! Timer-driven task scheduler.
//!
//! Every tick the scheduler looks for work: if no task is in progress it
//! takes the first pending task, hands its description to the assigned
//! agent, and runs the tool calls the agent answers with. A task that fails
//! halts the loop.
//!
//! At most one task is ever in progress. The check and the transition happen
//! together inside [`TaskStore::start_next_pending`].

use crate::agent::{AgentRegistry, ChatResponse, ToolCall};
use crate::error::{DevAgentsError, Result};
use crate::task::{Task, TaskId, TaskStatus, TaskStore};
use crate::tools::{ConfirmationGate, ToolContext, ToolRegistry};
use crate::workspace::Workspace;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Time between scheduler ticks. The first tick fires one interval after
/// `run` starts.
pub const TICK_INTERVAL: Duration = Duration::from_secs(5);

/// What a single tick did.
#[derive(Debug)]
pub enum TickOutcome {
    /// A task was already in progress.
    Busy,
    /// Nothing was pending.
    Idle,
    Completed(TaskId),
    Failed { id: TaskId, error: DevAgentsError },
}

/// Cloneable handle shared by the scheduler and its host.
///
/// Holds the task list and the shutdown token. The host creates it before
/// anything starts, so a signal can stop startup and the loop alike.
#[derive(Debug, Clone, Default)]
pub struct SchedulerHandle {
    tasks: TaskStore,
    shutdown: CancellationToken,
}

impl SchedulerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to exit at its next wait. Also cancels any pending
    /// confirmation prompt and server startup holding the same token.
    pub fn stop(&self) {
        tracing::info!("stopping task scheduler");
        self.shutdown.cancel();
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }
}

pub struct TaskScheduler {
    agents: AgentRegistry,
    tools: ToolRegistry,
    workspace: Workspace,
    gate: Arc<dyn ConfirmationGate>,
    handle: SchedulerHandle,
}

impl TaskScheduler {
    pub fn new(
        agents: AgentRegistry,
        tools: ToolRegistry,
        workspace: Workspace,
        gate: Arc<dyn ConfirmationGate>,
        handle: SchedulerHandle,
    ) -> Self {
        Self {
            agents,
            tools,
            workspace,
            gate,
            handle,
        }
    }

    /// Chat with one agent outside the task loop and run its tool calls.
    ///
    /// Used to hand the project goal to the first agent before `run`.
    pub async fn prompt_agent(&mut self, agent: &str, text: &str) -> Result<ChatResponse> {
        let response = self.chat(agent, text).await?;
        self.dispatch_tool_calls(&response.tool_calls).await?;
        Ok(response)
    }

    /// Run tool calls in order against this scheduler's workspace and tasks.
    pub async fn dispatch_tool_calls(&self, calls: &[ToolCall]) -> Result<Vec<String>> {
        let ctx = ToolContext {
            tasks: &self.handle.tasks,
            workspace: &self.workspace,
            gate: self.gate.as_ref(),
            cancel: &self.handle.shutdown,
        };
        self.tools.dispatch_all(calls, ctx).await
    }

    /// Run ticks until stopped or a task fails.
    ///
    /// # Errors
    ///
    /// `TaskFailed` naming the task that halted the loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut ticker = tokio::time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval = ?TICK_INTERVAL, "task scheduler started");

        loop {
            tokio::select! {
                biased;
                _ = self.handle.shutdown.cancelled() => {
                    tracing::info!("task scheduler stopped");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            if let TickOutcome::Failed { id, error } = self.tick().await {
                return Err(DevAgentsError::TaskFailed {
                    id,
                    reason: error.to_string(),
                });
            }
        }
    }

    /// One scheduling step.
    pub async fn tick(&mut self) -> TickOutcome {
        let Some(task) = self.handle.tasks.start_next_pending() else {
            if self.handle.tasks.has_in_progress() {
                tracing::debug!("task still in progress, skipping");
                return TickOutcome::Busy;
            }
            tracing::debug!("no pending tasks, skipping");
            return TickOutcome::Idle;
        };

        tracing::info!(
            task_id = %task.id,
            assigned_to = %task.assigned_to,
            task = %task.description,
            "scheduling task"
        );

        match self.execute(&task).await {
            Ok(()) => {
                self.finish(&task.id, TaskStatus::Completed);
                TickOutcome::Completed(task.id)
            }
            Err(error) => {
                tracing::error!(task_id = %task.id, error = %error, "task execution failed");
                self.finish(&task.id, TaskStatus::Failed);
                TickOutcome::Failed { id: task.id, error }
            }
        }
    }

    async fn execute(&mut self, task: &Task) -> Result<()> {
        let response = self.chat(&task.assigned_to, &task.description).await?;
        self.dispatch_tool_calls(&response.tool_calls).await?;
        Ok(())
    }

    async fn chat(&mut self, agent: &str, text: &str) -> Result<ChatResponse> {
        let session = self.agents.resolve(agent)?;
        let response = session
            .chat(text)
            .await
            .map_err(|source| DevAgentsError::Chat {
                agent: agent.to_string(),
                source,
            })?;

        if !response.message.is_empty() {
            tracing::debug!(agent = %agent, response = %response.message, "agent replied");
        }
        if !response.tool_calls.is_empty() {
            let names: Vec<&str> = response.tool_calls.iter().map(|c| c.name.as_str()).collect();
            tracing::debug!(agent = %agent, tool_calls = ?names, "agent requested tools");
        }
        Ok(response)
    }

    fn finish(&self, id: &str, status: TaskStatus) {
        match self.handle.tasks.update_status(id, status) {
            Ok(task) => tracing::info!(task_id = %task.id, status = %task.status, "task finished"),
            Err(e) => tracing::error!(task_id = %id, error = %e, "failed to update task status"),
        }
    }
}
