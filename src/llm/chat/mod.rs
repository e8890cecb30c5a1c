//! Shared chat completion transport
//!
//! Both vendors expose `POST {base}/chat/completions` with bearer
//! authentication and stream OpenAI-style chunks over SSE. The vendor
//! clients differ only in how they obtain the bearer token.

pub mod mapper;
pub mod sse;
pub mod types;

use futures::StreamExt;
use reqwest::Client;
use uuid::Uuid;

use crate::llm::core::{
    error::{error_from_response, LlmError},
    provider::EventStream,
    types::GenerateRequest,
};

use mapper::{to_chat_request, ChunkState};
use sse::parse_sse_stream;

/// Build the completions endpoint from a base URL
pub fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Send a streaming chat completion request and map the reply to events
pub(crate) async fn stream_chat_completion(
    http_client: &Client,
    url: &str,
    bearer_token: &str,
    model: &str,
    request: GenerateRequest,
) -> Result<EventStream, LlmError> {
    let chat_request = to_chat_request(model, request);

    let response = http_client
        .post(url)
        .bearer_auth(bearer_token)
        .header("Accept", "text/event-stream")
        .json(&chat_request)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let chunks = parse_sse_stream(Box::pin(response.bytes_stream()));
    let mut state = ChunkState::new(Uuid::new_v4().to_string());

    let events = async_stream::stream! {
        let mut chunks = chunks;
        let mut failed = false;

        while let Some(item) = chunks.next().await {
            match item {
                Ok(chunk) => {
                    for event in state.apply(chunk) {
                        yield Ok(event);
                    }
                }
                Err(e) => {
                    failed = true;
                    yield Err(e);
                    break;
                }
            }
        }

        if !failed {
            for event in state.finish() {
                yield Ok(event);
            }
        }
    };

    Ok(Box::pin(events))
}
