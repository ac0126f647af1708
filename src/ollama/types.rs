//! Wire types for the Ollama `/api/chat` endpoint.

use crate::agent::{ChatChunk, ChatError, ChatRequest, Message, ToolCall};
use crate::config::ToolSpec;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

/// Request body for `POST /api/chat`.
///
/// Config tool specs already use the function-calling schema Ollama expects,
/// so they are forwarded without conversion.
#[derive(Debug, Serialize)]
pub struct ChatRequestBody<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    #[serde(skip_serializing_if = "no_tools")]
    pub tools: &'a [ToolSpec],
    pub stream: bool,
}

impl<'a> From<ChatRequest<'a>> for ChatRequestBody<'a> {
    fn from(request: ChatRequest<'a>) -> Self {
        Self {
            model: request.model,
            messages: request.messages,
            tools: request.tools,
            stream: true,
        }
    }
}

fn no_tools(tools: &&[ToolSpec]) -> bool {
    tools.is_empty()
}

/// One NDJSON line of a streamed chat response.
#[derive(Debug, Deserialize)]
pub struct ChatResponseLine {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
pub struct WireToolCall {
    pub function: WireFunction,
}

#[derive(Debug, Deserialize)]
pub struct WireFunction {
    pub name: String,
    #[serde(default, deserialize_with = "object_or_json_string")]
    pub arguments: Map<String, Value>,
}

impl ChatResponseLine {
    /// Convert to a transport-neutral chunk, surfacing in-stream errors.
    pub fn into_chunk(self) -> Result<ChatChunk, ChatError> {
        if let Some(error) = self.error {
            return Err(ChatError::Remote(error));
        }

        let Some(message) = self.message else {
            return Ok(ChatChunk::default());
        };

        Ok(ChatChunk {
            content: message.content,
            tool_calls: message
                .tool_calls
                .into_iter()
                .map(|call| ToolCall {
                    name: call.function.name,
                    arguments: call.function.arguments,
                })
                .collect(),
        })
    }
}

/// Accepts tool arguments as a JSON object or as a string holding one.
///
/// Some models emit `"arguments": "{\"file\": \"a.txt\"}"` instead of an
/// object.
fn object_or_json_string<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        Value::String(raw) if raw.trim().is_empty() => Ok(Map::new()),
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(de::Error::custom(format!(
                "tool arguments string is not a JSON object: {raw}"
            ))),
        },
        other => Err(de::Error::custom(format!(
            "tool arguments must be an object, got {other}"
        ))),
    }
}
