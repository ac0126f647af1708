//! Model serving processes.
//!
//! Each agent talks to its own model server. A [`Spawner`] starts that
//! server, reports where it listens, and shuts it down again.

mod ollama;

use crate::error::{DevAgentsError, Result};
use async_trait::async_trait;
use std::net::TcpListener;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use ollama::OllamaSpawner;

/// Engines a config may name.
pub const SUPPORTED_ENGINES: &[&str] = &["ollama"];

/// Errors from starting or stopping a model server.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to find free port: {0}")]
    PortUnavailable(#[source] std::io::Error),

    #[error("failed to start '{program}': {source}")]
    Start {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server process exited before becoming ready: {0}")]
    ProcessExited(String),

    #[error("timeout waiting for server to start after {0:?}")]
    Timeout(Duration),

    #[error("server startup cancelled")]
    Cancelled,

    #[error("failed to stop server: {0}")]
    Stop(#[source] std::io::Error),
}

/// Lifecycle of one model server process.
#[async_trait]
pub trait Spawner: Send {
    /// Start the server and wait until it answers.
    async fn spawn(&mut self, cancel: &CancellationToken) -> std::result::Result<(), SpawnError>;

    /// Base URL of the running server, once spawned.
    fn base_url(&self) -> Option<&str>;

    /// Stop the server. A no-op when it was never spawned.
    async fn stop(&mut self) -> std::result::Result<(), SpawnError>;
}

/// Build the spawner for a configured engine.
pub fn spawner_for(engine: &str) -> Result<Box<dyn Spawner>> {
    match engine {
        "ollama" => Ok(Box::new(OllamaSpawner::new())),
        other => Err(DevAgentsError::UserError(format!(
            "unsupported engine '{}' (supported: {})",
            other,
            SUPPORTED_ENGINES.join(", ")
        ))),
    }
}

/// Ask the OS for an unused loopback port.
///
/// The listener is dropped before returning, so another process can race
/// for the port; the server start fails in that case.
pub fn find_free_port() -> std::result::Result<u16, SpawnError> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(SpawnError::PortUnavailable)?;
    let port = listener
        .local_addr()
        .map_err(SpawnError::PortUnavailable)?
        .port();
    Ok(port)
}
