//! DeepSeek client implementation

use async_trait::async_trait;
use reqwest::Client;

use crate::llm::chat::{completions_url, stream_chat_completion};
use crate::llm::core::{
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::GenerateRequest,
};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";

/// Connection settings for the DeepSeek gateway
#[derive(Debug, Clone)]
pub struct DeepSeekSettings {
    /// API key (`DEEPSEEK_API_KEY`)
    pub api_key: Option<String>,
    /// Gateway base URL (`DEEPSEEK_API_BASE_URL`)
    pub base_url: String,
    /// Model identifier (`DEEPSEEK_MODEL`)
    pub model: String,
}

impl Default for DeepSeekSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Client for DeepSeek chat completions
pub struct DeepSeekClient {
    /// HTTP client for making requests
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl DeepSeekClient {
    /// Create a new DeepSeek client
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client
    /// cannot be built.
    pub fn new(settings: DeepSeekSettings) -> Result<Self, LlmError> {
        let api_key = settings
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                LlmError::AuthenticationError("DEEPSEEK_API_KEY is not set".to_string())
            })?;

        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key,
            base_url: settings.base_url,
            model: settings.model,
        })
    }

    /// Build the endpoint URL for streaming
    fn build_endpoint_url(&self) -> String {
        completions_url(&self.base_url)
    }
}

#[async_trait]
impl LlmProvider for DeepSeekClient {
    fn name(&self) -> &str {
        "deepseek"
    }

    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        let url = self.build_endpoint_url();
        stream_chat_completion(&self.http_client, &url, &self.api_key, &self.model, request).await
    }
}
