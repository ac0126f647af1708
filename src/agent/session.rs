//! History-owning agent session.

use super::{Chat, ChatError, ChatRequest, ChatResponse, ChatTransport, Message};
use crate::config::AgentConfig;
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

/// A stateful conversation with one model.
///
/// The history starts with the system prompt and only grows: each turn adds
/// the user message, and a successful turn adds the assistant's full text.
/// A failed turn keeps the user message and nothing else.
pub struct AgentSession {
    config: AgentConfig,
    history: Vec<Message>,
    transport: Arc<dyn ChatTransport>,
}

impl AgentSession {
    pub fn new(config: AgentConfig, transport: Arc<dyn ChatTransport>) -> Self {
        let history = vec![Message::system(config.prompt.clone())];
        Self {
            config,
            history,
            transport,
        }
    }
}

#[async_trait]
impl Chat for AgentSession {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn chat(&mut self, text: &str) -> Result<ChatResponse, ChatError> {
        self.history.push(Message::user(text));

        let request = ChatRequest {
            model: &self.config.model,
            messages: &self.history,
            tools: &self.config.tools,
        };
        let mut stream = self.transport.stream_chat(request).await?;

        let mut response = ChatResponse::default();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            response.message.push_str(&chunk.content);
            response.tool_calls.extend(chunk.tool_calls);
        }

        self.history.push(Message::assistant(response.message.clone()));

        tracing::debug!(
            agent = %self.config.name,
            message = %response.message,
            tool_calls = response.tool_calls.len(),
            "chat turn finished"
        );

        Ok(response)
    }
}
