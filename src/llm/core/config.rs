//! Generation parameters and provider selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::LlmError;
use crate::llm::deepseek::DeepSeekSettings;
use crate::llm::gigachat::GigaChatSettings;

/// Parameters for controlling text generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
    /// Randomness (0.0-2.0, higher = more random)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Nucleus sampling threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Stop generation when these sequences are encountered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

impl GenerationConfig {
    /// Create a new configuration with the specified max tokens
    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            temperature: None,
            top_p: None,
            stop_sequences: None,
        }
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the top_p value
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set stop sequences
    pub fn with_stop_sequences(mut self, stop_sequences: Vec<String>) -> Self {
        self.stop_sequences = Some(stop_sequences);
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// Vendors that can back the linguistic model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// DeepSeek through an OpenAI-compatible gateway
    DeepSeek,
    /// Sber GigaChat
    GigaChat,
}

impl ProviderKind {
    /// Configuration name of the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::GigaChat => "gigachat",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "deepseek" => Ok(ProviderKind::DeepSeek),
            "gigachat" => Ok(ProviderKind::GigaChat),
            _ => Err(LlmError::InvalidRequest(format!("Unknown provider: {}", name))),
        }
    }
}

/// Everything needed to build a provider client
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Which vendor to talk to
    pub provider: ProviderKind,
    pub deepseek: DeepSeekSettings,
    pub gigachat: GigaChatSettings,
    /// Generation parameters applied to every prompt
    pub generation: GenerationConfig,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::GigaChat,
            deepseek: DeepSeekSettings::default(),
            gigachat: GigaChatSettings::default(),
            generation: GenerationConfig::default(),
        }
    }
}
