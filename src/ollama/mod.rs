//! Ollama model server integration.
//!
//! - **Client**: heartbeat and streaming `/api/chat` over HTTP
//! - **Stream**: NDJSON line decoding of the response body
//! - **Types**: request and response wire shapes

mod client;
mod stream;
mod types;

pub use client::OllamaClient;
