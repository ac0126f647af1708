//! `ollama serve` on a private loopback port.

use super::{SpawnError, Spawner, find_free_port};
use crate::ollama::OllamaClient;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

const STARTUP_TIMEOUT: Duration = Duration::from_secs(30);
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(100);
const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(1);
const STOP_GRACE: Duration = Duration::from_secs(5);

pub struct OllamaSpawner {
    program: String,
    args: Vec<String>,
    startup_timeout: Duration,
    base_url: Option<String>,
    child: Option<Child>,
}

impl OllamaSpawner {
    pub fn new() -> Self {
        Self::with_command("ollama", ["serve"])
    }

    /// Run a different server binary. It must honour `OLLAMA_HOST`.
    pub fn with_command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            startup_timeout: STARTUP_TIMEOUT,
            base_url: None,
            child: None,
        }
    }
}

impl Default for OllamaSpawner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Spawner for OllamaSpawner {
    async fn spawn(&mut self, cancel: &CancellationToken) -> Result<(), SpawnError> {
        let port = find_free_port()?;
        let host = format!("127.0.0.1:{port}");
        let base_url = format!("http://{host}");

        tracing::info!(url = %base_url, program = %self.program, "starting model server");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("OLLAMA_HOST", &host)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SpawnError::Start {
                program: self.program.clone(),
                source,
            })?;

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, "stderr"));
        }

        let client = OllamaClient::new(base_url.as_str());
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(SpawnError::Cancelled),
            status = child.wait() => Err(SpawnError::ProcessExited(match status {
                Ok(status) => status.to_string(),
                Err(e) => e.to_string(),
            })),
            _ = tokio::time::sleep(self.startup_timeout) => {
                Err(SpawnError::Timeout(self.startup_timeout))
            }
            _ = wait_until_ready(&client) => Ok(()),
        };

        self.child = Some(child);
        self.base_url = Some(base_url);

        if result.is_ok() {
            tracing::info!(url = ?self.base_url, "model server is ready");
        }
        result
    }

    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    async fn stop(&mut self) -> Result<(), SpawnError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        if let Ok(Some(_)) = child.try_wait() {
            return Ok(());
        }

        if let Some(pid) = child.id()
            && interrupt(pid).await
        {
            match tokio::time::timeout(STOP_GRACE, child.wait()).await {
                Ok(_) => {
                    tracing::debug!(pid, "model server stopped");
                    return Ok(());
                }
                Err(_) => {
                    tracing::warn!(pid, "model server ignored interrupt, killing");
                }
            }
        }

        child.kill().await.map_err(SpawnError::Stop)
    }
}

/// Poll `GET /` until the server answers.
async fn wait_until_ready(client: &OllamaClient) {
    loop {
        if let Ok(Ok(())) = tokio::time::timeout(HEARTBEAT_TIMEOUT, client.heartbeat()).await {
            return;
        }
        tokio::time::sleep(HEARTBEAT_INTERVAL).await;
    }
}

/// Send SIGINT via `kill -INT`; false when it could not be delivered.
async fn interrupt(pid: u32) -> bool {
    match Command::new("kill")
        .arg("-INT")
        .arg(pid.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
    {
        Ok(status) => status.success(),
        Err(e) => {
            tracing::debug!(pid, error = %e, "failed to send interrupt");
            false
        }
    }
}

async fn forward_lines<R>(reader: R, stream: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::debug!(stream, line = %line, "model server output");
    }
}
