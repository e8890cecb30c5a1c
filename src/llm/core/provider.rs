//! Provider trait for LLM implementations

use async_trait::async_trait;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use super::{
    config::{LlmSettings, ProviderKind},
    error::LlmError,
    types::{GenerateRequest, GenerateResponse, StreamEvent},
};
use crate::llm::deepseek::DeepSeekClient;
use crate::llm::gigachat::GigaChatClient;

/// Stream of events produced by a provider
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;

/// Main interface that all LLM provider implementations must satisfy
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short vendor name used in logs
    fn name(&self) -> &str;

    /// Stream generate content from the LLM
    ///
    /// Sends the request and returns a stream of events representing the
    /// incremental response.
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError>;

    /// Generate content and wait for the complete response
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let stream = self.stream_generate(request).await?;
        collect_response(stream).await
    }
}

/// Drain an event stream into a single response
///
/// Text deltas are concatenated in order. An `Error` event aborts collection.
pub async fn collect_response(mut stream: EventStream) -> Result<GenerateResponse, LlmError> {
    let mut response = GenerateResponse::default();

    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::MessageStart { .. } => {}
            StreamEvent::TextDelta { text } => response.text.push_str(&text),
            StreamEvent::MessageEnd {
                finish_reason,
                usage,
            } => {
                response.finish_reason = Some(finish_reason);
                if usage.is_some() {
                    response.usage = usage;
                }
            }
            StreamEvent::Error { error } => return Err(LlmError::StreamError(error)),
        }
    }

    Ok(response)
}

/// Create an LLM provider for the configured vendor
///
/// # Example
///
/// ```rust,no_run
/// use vocab::llm::{create_provider, LlmSettings, ProviderKind};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut settings = LlmSettings::default();
/// settings.provider = ProviderKind::DeepSeek;
/// settings.deepseek.api_key = Some("sk-...".to_string());
/// let provider = create_provider(settings.provider, &settings)?;
/// # Ok(())
/// # }
/// ```
pub fn create_provider(
    kind: ProviderKind,
    settings: &LlmSettings,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    match kind {
        ProviderKind::DeepSeek => {
            let client = DeepSeekClient::new(settings.deepseek.clone())?;
            Ok(Box::new(client))
        }
        ProviderKind::GigaChat => {
            let client = GigaChatClient::new(settings.gigachat.clone())?;
            Ok(Box::new(client))
        }
    }
}
