//! HTTP client for one Ollama server.

use super::stream::decode_ndjson;
use super::types::ChatRequestBody;
use crate::agent::{ChatError, ChatRequest, ChatTransport, ChunkStream};
use async_trait::async_trait;
use futures::StreamExt;

const CHAT_PATH: &str = "/api/chat";

/// Talks to an Ollama server at `base_url` (e.g. `http://127.0.0.1:41234`).
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// `GET /`. Succeeds once the server answers with a success status.
    pub async fn heartbeat(&self) -> Result<(), ChatError> {
        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for OllamaClient {
    async fn stream_chat(&self, request: ChatRequest<'_>) -> Result<ChunkStream, ChatError> {
        let url = format!("{}{}", self.base_url, CHAT_PATH);
        let body = ChatRequestBody::from(request);

        tracing::debug!(
            url = %url,
            model = %body.model,
            messages = body.messages.len(),
            tools = body.tools.len(),
            "sending chat request"
        );

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(decode_ndjson(Box::pin(response.bytes_stream())).boxed())
    }
}
