//! LLM Abstraction Layer
//!
//! This module provides a unified interface for the chat-completion vendors
//! that generate definitions, examples and quiz questions: DeepSeek (through
//! an OpenAI-compatible gateway) and Sber GigaChat. Both speak the same
//! streaming wire protocol, implemented once in [`chat`].

pub mod chat;
pub mod core;
pub mod deepseek;
pub mod gigachat;

// Re-export commonly used types
pub use core::{
    config::{GenerationConfig, LlmSettings, ProviderKind},
    error::LlmError,
    provider::{collect_response, create_provider, EventStream, LlmProvider},
    types::{
        FinishReason, GenerateRequest, GenerateResponse, Message, MessageRole, StreamEvent,
        UsageMetadata,
    },
};

pub use deepseek::{DeepSeekClient, DeepSeekSettings};
pub use gigachat::{GigaChatClient, GigaChatSettings};
