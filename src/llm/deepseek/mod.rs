//! DeepSeek provider implementation
//!
//! DeepSeek models are reached through an OpenAI-compatible gateway
//! (OpenRouter by default) authenticated with a static API key.

pub mod client;

pub use client::{DeepSeekClient, DeepSeekSettings};
