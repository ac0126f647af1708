//! Agent sessions.
//!
//! An agent is a named conversational session with one model. This module
//! provides:
//!
//! - **Chat**: the contract the scheduler relies on (`chat(text)`)
//! - **Session**: the history-owning implementation over a transport
//! - **Transport**: the streaming seam to a model server
//! - **Registry**: name → session lookup for task routing

mod history;
mod registry;
mod session;
mod transport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// Re-export public API
pub use history::Message;
pub use registry::AgentRegistry;
pub use session::AgentSession;
pub use transport::{ChatChunk, ChatRequest, ChatTransport, ChunkStream};

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Registered tool name, e.g. `write-file`.
    pub name: String,

    /// Arguments keyed by parameter name.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

#[cfg(test)]
impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Result of one chat turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    /// Concatenated assistant text.
    pub message: String,

    /// Every tool call emitted during the turn, in order.
    pub tool_calls: Vec<ToolCall>,
}

/// Errors from a chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request could not be sent or the stream broke.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// A streamed line could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The server reported an error inside the stream.
    #[error("model error: {0}")]
    Remote(String),
}

/// A conversational agent the scheduler can hand tasks to.
///
/// `chat` takes `&mut self`: one session never serves two turns at once.
#[async_trait]
pub trait Chat: Send + Sync {
    /// Agent name, used as the task assignment key.
    fn name(&self) -> &str;

    /// Send `text` as a user turn and collect the assistant's reply.
    async fn chat(&mut self, text: &str) -> Result<ChatResponse, ChatError>;
}
