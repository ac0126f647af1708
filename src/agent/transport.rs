//! Streaming seam between a session and a model server.

use super::{ChatError, Message, ToolCall};
use crate::config::ToolSpec;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// One chat request: the full history plus the tools the model may call.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub tools: &'a [ToolSpec],
}

/// A partial response: a text fragment and any tool calls it carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatChunk {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

pub type ChunkStream = BoxStream<'static, Result<ChatChunk, ChatError>>;

/// Sends a chat request and yields the response as a stream of chunks.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn stream_chat(&self, request: ChatRequest<'_>) -> Result<ChunkStream, ChatError>;
}
