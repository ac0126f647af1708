//! NDJSON decoding of a streamed chat response.
//!
//! The body arrives as arbitrary byte chunks; lines may be split across
//! chunks or several lines may share one. Each complete, non-blank line is
//! decoded into a [`ChatChunk`].

use super::types::ChatResponseLine;
use crate::agent::{ChatChunk, ChatError};
use futures::stream::{self, Stream, StreamExt};
use std::fmt::Display;

struct LineState<S> {
    bytes: S,
    buffer: Vec<u8>,
    finished: bool,
}

/// Decode a byte stream of NDJSON lines into chat chunks.
///
/// A transport error ends the stream after it is yielded.
pub fn decode_ndjson<S, B, E>(bytes: S) -> impl Stream<Item = Result<ChatChunk, ChatError>>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Display,
{
    let state = LineState {
        bytes,
        buffer: Vec::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(pos) = state.buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = state.buffer.drain(..=pos).collect();
                if is_blank(&line) {
                    continue;
                }
                return Some((decode_line(&line), state));
            }

            if state.finished {
                if is_blank(&state.buffer) {
                    return None;
                }
                let line = std::mem::take(&mut state.buffer);
                return Some((decode_line(&line), state));
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => state.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    state.buffer.clear();
                    state.finished = true;
                    return Some((Err(ChatError::Transport(e.to_string())), state));
                }
                None => state.finished = true,
            }
        }
    })
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

fn decode_line(line: &[u8]) -> Result<ChatChunk, ChatError> {
    serde_json::from_slice::<ChatResponseLine>(line)
        .map_err(|e| {
            ChatError::Decode(format!(
                "{}: {}",
                e,
                String::from_utf8_lossy(line).trim_end()
            ))
        })?
        .into_chunk()
}
