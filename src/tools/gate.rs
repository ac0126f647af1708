//! Interactive confirmation before running commands.

use super::ToolError;
use async_trait::async_trait;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Asks whether a command may run.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// `Ok(())` to proceed; an error aborts the command.
    async fn confirm(
        &self,
        command: &str,
        dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), ToolError>;
}

/// Reads `YES` / `NO` answers line by line from one shared input.
///
/// Any other answer re-prompts. Cancellation and end of input end the wait
/// with an error.
pub struct LineGate<R> {
    input: Mutex<R>,
}

impl<R> LineGate<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

impl LineGate<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R> ConfirmationGate for LineGate<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn confirm(
        &self,
        command: &str,
        dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), ToolError> {
        let mut input = self.input.lock().await;

        tracing::info!(
            command = %command,
            working_directory = %dir.display(),
            "asking permission to run command"
        );

        loop {
            tracing::info!("Type 'YES' to run the command or 'NO' to skip:");

            let mut line = String::new();
            let read = tokio::select! {
                _ = cancel.cancelled() => return Err(ToolError::ConfirmationCancelled),
                read = input.read_line(&mut line) => read,
            };

            if read.map_err(|e| ToolError::io("failed to read confirmation", e))? == 0 {
                return Err(ToolError::InputClosed);
            }

            match line.trim() {
                "YES" => return Ok(()),
                "NO" => return Err(ToolError::SkippedByUser),
                _ => tracing::info!("Invalid input. Please type 'YES' or 'NO'"),
            }
        }
    }
}
