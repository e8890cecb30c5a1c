//! Mapping between abstraction types and chat completion wire types

use crate::llm::core::types::{
    FinishReason, GenerateRequest, Message, StreamEvent, UsageMetadata,
};

use super::types::{ChatCompletionChunk, ChatCompletionRequest, ChatMessage};

/// Convert our abstraction request to the chat completion format
///
/// A system prompt becomes the leading `system` message.
pub fn to_chat_request(model: &str, request: GenerateRequest) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);

    if let Some(system) = request.system {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system,
        });
    }
    messages.extend(request.messages.into_iter().map(to_chat_message));

    ChatCompletionRequest {
        model: model.to_string(),
        messages,
        max_tokens: Some(request.config.max_tokens),
        temperature: request.config.temperature,
        top_p: request.config.top_p,
        stop: request.config.stop_sequences,
        stream: true,
    }
}

fn to_chat_message(message: Message) -> ChatMessage {
    ChatMessage {
        role: message.role.as_str().to_string(),
        content: message.content,
    }
}

/// Accumulates state while chunks arrive
///
/// Chunk streams carry no explicit start or end frame: the first chunk
/// starts the message, and the finish reason and usage can arrive in
/// separate chunks, so `MessageEnd` is only emitted by [`ChunkState::finish`].
#[derive(Debug)]
pub struct ChunkState {
    fallback_id: String,
    started: bool,
    finish_reason: Option<FinishReason>,
    usage: Option<UsageMetadata>,
}

impl ChunkState {
    /// `fallback_id` is used when the vendor does not send chunk ids
    pub fn new(fallback_id: impl Into<String>) -> Self {
        Self {
            fallback_id: fallback_id.into(),
            started: false,
            finish_reason: None,
            usage: None,
        }
    }

    /// Convert one chunk into zero or more events
    pub fn apply(&mut self, chunk: ChatCompletionChunk) -> Vec<StreamEvent> {
        let mut events = Vec::new();

        if let Some(error) = chunk.error {
            events.push(StreamEvent::Error {
                error: format!("{} ({})", error.message, error.code_string()),
            });
            return events;
        }

        if !self.started {
            self.started = true;
            events.push(StreamEvent::MessageStart {
                id: chunk.id.clone().unwrap_or_else(|| self.fallback_id.clone()),
            });
        }

        // Only the first choice is requested
        if let Some(choice) = chunk.choices.into_iter().find(|c| c.index == 0) {
            if let Some(text) = choice.delta.content {
                if !text.is_empty() {
                    events.push(StreamEvent::TextDelta { text });
                }
            }
            if let Some(reason) = choice.finish_reason {
                self.finish_reason = Some(FinishReason::from_wire(&reason));
            }
        }

        if let Some(usage) = chunk.usage {
            self.usage = Some(UsageMetadata::new(
                usage.prompt_tokens,
                usage.completion_tokens,
            ));
        }

        events
    }

    /// Emit the closing event once the byte stream has ended
    pub fn finish(self) -> Vec<StreamEvent> {
        if !self.started {
            return Vec::new();
        }

        vec![StreamEvent::MessageEnd {
            finish_reason: self
                .finish_reason
                .unwrap_or_else(|| FinishReason::Other("incomplete".to_string())),
            usage: self.usage,
        }]
    }
}
