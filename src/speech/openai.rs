//! OpenAI-compatible `/audio/speech` client

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;

use super::{SpeechError, SpeechSynthesizer};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "tts-1";
pub const DEFAULT_VOICE: &str = "alloy";

/// Connection settings for the TTS endpoint
#[derive(Debug, Clone)]
pub struct SpeechSettings {
    /// `TTS_API_KEY`
    pub api_key: String,
    /// `TTS_BASE_URL`
    pub base_url: String,
    /// `TTS_MODEL`
    pub model: String,
    /// `TTS_VOICE`
    pub voice: String,
}

impl SpeechSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

/// Client for OpenAI-compatible speech synthesis
pub struct OpenAiSpeechClient {
    http_client: Client,
    settings: SpeechSettings,
}

impl OpenAiSpeechClient {
    pub fn new(settings: SpeechSettings) -> Result<Self, SpeechError> {
        if settings.api_key.is_empty() {
            return Err(SpeechError::Configuration("TTS_API_KEY is empty".to_string()));
        }

        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| SpeechError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    fn build_endpoint_url(&self) -> String {
        format!("{}/audio/speech", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeechClient {
    async fn synthesize(&self, text: &str) -> Result<Bytes, SpeechError> {
        let body = SpeechRequest {
            model: &self.settings.model,
            input: text,
            voice: &self.settings.voice,
            response_format: "mp3",
        };

        let response = self
            .http_client
            .post(self.build_endpoint_url())
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?)
    }
}
