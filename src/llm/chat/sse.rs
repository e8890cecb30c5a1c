//! Server-Sent Events (SSE) parser for chat completion streams

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::ChatCompletionChunk;

/// Terminal sentinel sent by OpenAI-compatible servers
const DONE_MARKER: &str = "[DONE]";

/// Parse a stream of bytes as chat completion SSE events
///
/// The format is:
/// ```text
/// data: {"id":"...","choices":[{"delta":{"content":"Hel"}}]}
///
/// : keep-alive comment
///
/// data: [DONE]
/// ```
///
/// Bytes are buffered until a blank line closes an event, so multi-byte
/// characters split across network chunks are decoded intact. Comment
/// lines and the `[DONE]` sentinel produce no items.
pub fn parse_sse_stream(
    byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>,
) -> Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, LlmError>> + Send>> {
    let mut buffer: Vec<u8> = Vec::new();

    let event_stream = byte_stream.flat_map(move |chunk_result| {
        let chunk = match chunk_result {
            Ok(bytes) => bytes,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::StreamError(e.to_string()))]);
            }
        };

        buffer.extend(chunk.iter().filter(|&&b| b != b'\r'));

        let mut events = Vec::new();
        while let Some(event_end) = find_event_boundary(&buffer) {
            let raw: Vec<u8> = buffer.drain(..event_end + 2).collect();
            match std::str::from_utf8(&raw[..event_end]) {
                Ok(event_text) => {
                    if let Some(parsed) = parse_event(event_text) {
                        events.push(parsed);
                    }
                }
                Err(e) => events.push(Err(LlmError::StreamError(format!(
                    "Invalid UTF-8 in stream: {}",
                    e
                )))),
            }
        }

        futures::stream::iter(events)
    });

    Box::pin(event_stream)
}

fn find_event_boundary(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|pair| pair == b"\n\n")
}

/// Parse a single SSE event from its text representation
fn parse_event(event_text: &str) -> Option<Result<ChatCompletionChunk, LlmError>> {
    let mut data_lines: Vec<&str> = Vec::new();

    for line in event_text.lines() {
        if line.starts_with(':') {
            continue;
        }
        if let Some(data) = line.strip_prefix("data:") {
            data_lines.push(data.trim());
        }
    }

    if data_lines.is_empty() {
        return None;
    }

    let data = data_lines.join("\n");
    if data.is_empty() || data == DONE_MARKER {
        return None;
    }

    match serde_json::from_str::<ChatCompletionChunk>(&data) {
        Ok(chunk) => Some(Ok(chunk)),
        Err(e) => Some(Err(LlmError::SerializationError(format!(
            "Failed to parse chat completion chunk: {}. Data: {}",
            e, data
        )))),
    }
}
