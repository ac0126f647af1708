use super::{Tool, ToolContext, ToolError, decode_args};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::process::Stdio;
use tokio::process::Command;

/// `run-command`: run one program in the workspace once the user agrees.
///
/// The command line is split on whitespace; there is no shell, so quotes,
/// pipes and redirects are passed through as plain arguments.
pub struct RunCommand;

#[derive(Debug, Deserialize)]
struct RunCommandArgs {
    command: String,
    #[serde(default)]
    working_directory: Option<String>,
}

#[async_trait]
impl Tool for RunCommand {
    fn name(&self) -> &'static str {
        "run-command"
    }

    async fn call(&self, args: Map<String, Value>, ctx: ToolContext<'_>) -> Result<String, ToolError> {
        let args: RunCommandArgs = decode_args(args)?;
        let dir = ctx.workspace.resolve_dir(args.working_directory.as_deref())?;

        let words: Vec<&str> = args.command.split_whitespace().collect();
        let Some((program, rest)) = words.split_first() else {
            return Err(ToolError::EmptyCommand);
        };

        ctx.gate.confirm(&args.command, &dir, ctx.cancel).await?;

        tracing::info!(command = %args.command, working_directory = %dir.display(), "running command");

        let output = Command::new(program)
            .args(rest)
            .current_dir(&dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ToolError::io(format!("failed to run '{program}'"), e))?;

        if !output.status.success() {
            return Err(ToolError::CommandFailed {
                command: args.command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::info!(output = %stdout, "command output");
        Ok(stdout)
    }
}
