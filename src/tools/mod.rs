//! Tool dispatch.
//!
//! Models request tools by name with a JSON object of arguments. The
//! [`ToolRegistry`] maps each name to a [`Tool`] handler; handlers decode
//! their arguments into typed structs before doing any work.
//!
//! Built-in tools:
//!
//! - `assign-task`: queue a task for another agent
//! - `run-command`: run a program inside the workspace after confirmation
//! - `write-file` / `edit-file`: create or overwrite a file
//! - `read-file`: return a file's contents
//! - `list-files`: list a workspace directory

mod command;
mod files;
mod gate;
mod task;

use crate::agent::ToolCall;
use crate::error::{DevAgentsError, Result};
use crate::task::TaskStore;
use crate::workspace::Workspace;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use command::RunCommand;
pub use files::{ListFiles, ReadFile, WriteFile};
pub use gate::{ConfirmationGate, LineGate};
pub use task::AssignTask;

/// Errors raised by a single tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("working directory does not exist: {0}")]
    WorkingDirectoryNotFound(String),

    #[error("path escapes the workspace root: {0}")]
    PathEscapesRoot(String),

    #[error("command execution skipped by user")]
    SkippedByUser,

    #[error("confirmation cancelled")]
    ConfirmationCancelled,

    #[error("confirmation input closed")]
    InputClosed,

    #[error("command is empty")]
    EmptyCommand,

    #[error("command '{command}' failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ToolError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Everything a tool may touch while it runs.
#[derive(Clone, Copy)]
pub struct ToolContext<'a> {
    pub tasks: &'a TaskStore,
    pub workspace: &'a Workspace,
    pub gate: &'a dyn ConfirmationGate,
    pub cancel: &'a CancellationToken,
}

/// A named operation a model can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run the tool and return its result text.
    async fn call(
        &self,
        args: Map<String, Value>,
        ctx: ToolContext<'_>,
    ) -> std::result::Result<String, ToolError>;
}

/// Decode a tool's argument object into its typed form.
pub fn decode_args<T: DeserializeOwned>(
    args: Map<String, Value>,
) -> std::result::Result<T, ToolError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Tools keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in tool.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AssignTask));
        registry.register(Box::new(RunCommand));
        registry.register(Box::new(WriteFile::new("write-file")));
        registry.register(Box::new(WriteFile::new("edit-file")));
        registry.register(Box::new(ReadFile));
        registry.register(Box::new(ListFiles));
        registry
    }

    /// Add a tool, replacing any tool registered under the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name(), tool);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    /// Invoke one tool by name.
    ///
    /// # Errors
    ///
    /// - `ToolNotFound` when nothing is registered under `name`
    /// - `Tool` wrapping the handler's error, naming the tool
    pub async fn call(
        &self,
        name: &str,
        args: Map<String, Value>,
        ctx: ToolContext<'_>,
    ) -> Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| DevAgentsError::ToolNotFound(name.to_string()))?;

        let shown = Value::Object(args.clone());
        tracing::info!(tool = %name, args = %shown, "calling tool");

        tool.call(args, ctx).await.map_err(|source| {
            tracing::error!(tool = %name, error = %source, "tool failed");
            DevAgentsError::Tool {
                tool: name.to_string(),
                source,
            }
        })
    }

    /// Run tool calls in order, stopping at the first failure.
    ///
    /// Side effects of calls that already succeeded are kept.
    pub async fn dispatch_all(&self, calls: &[ToolCall], ctx: ToolContext<'_>) -> Result<Vec<String>> {
        let mut outputs = Vec::with_capacity(calls.len());
        for call in calls {
            let output = self.call(&call.name, call.arguments.clone(), ctx).await?;
            outputs.push(output);
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests;
