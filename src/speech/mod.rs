//! Spoken pronunciation of words
//!
//! A [`SpeechSynthesizer`] turns text into encoded audio and
//! [`AudioStorage`] keeps the result as a file under the media root.

pub mod openai;
pub mod storage;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use openai::{OpenAiSpeechClient, SpeechSettings};
pub use storage::AudioStorage;

/// Errors raised while producing or storing audio
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Missing API key or bad parameters
    #[error("Speech configuration error: {0}")]
    Configuration(String),

    /// The TTS endpoint answered with a failure
    #[error("Speech HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },

    /// Writing the audio file failed
    #[error("Audio storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        SpeechError::Http {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}

/// Text-to-speech backend
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into encoded audio
    async fn synthesize(&self, text: &str) -> Result<Bytes, SpeechError>;

    /// File extension of the produced audio
    fn file_extension(&self) -> &str {
        "mp3"
    }
}
