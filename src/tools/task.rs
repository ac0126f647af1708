use super::{Tool, ToolContext, ToolError, decode_args};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

/// `assign-task`: queue a pending task for another agent.
pub struct AssignTask;

#[derive(Debug, Deserialize)]
struct AssignTaskArgs {
    assignee: String,
    task: String,
}

#[async_trait]
impl Tool for AssignTask {
    fn name(&self) -> &'static str {
        "assign-task"
    }

    async fn call(&self, args: Map<String, Value>, ctx: ToolContext<'_>) -> Result<String, ToolError> {
        let args: AssignTaskArgs = decode_args(args)?;
        ctx.tasks.add_task(args.task, args.assignee);
        Ok(String::new())
    }
}
