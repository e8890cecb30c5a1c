//! GigaChat provider implementation
//!
//! GigaChat exchanges a long-lived authorization key for short-lived access
//! tokens, then serves OpenAI-style chat completions.

pub mod auth;
pub mod client;

pub use client::{GigaChatClient, GigaChatSettings};
