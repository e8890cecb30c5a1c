//! Service configuration read from the environment

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::llm::{DeepSeekSettings, GigaChatSettings, LlmSettings, ProviderKind};
use crate::speech::SpeechSettings;

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `VOCAB_BIND_ADDR`
    pub bind_addr: SocketAddr,

    /// `DATABASE_URL`; `None` selects the in-memory store
    pub database_url: Option<String>,

    /// `DATABASE_POOL_SIZE`
    pub pool_size: usize,

    /// Provider selection and vendor settings
    pub llm: LlmSettings,

    /// `VOCAB_EXAMPLES_COUNT`
    pub examples_count: usize,

    /// `None` when `TTS_API_KEY` is unset, which disables audio
    pub speech: Option<SpeechSettings>,

    /// `MEDIA_ROOT`
    pub media_root: PathBuf,

    /// `MEDIA_URL`
    pub media_url: String,

    /// `VOCAB_PUBLIC_URL`, e.g. `https://vocab.example.com`; links are built
    /// from request headers when unset
    pub public_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            database_url: None,
            pool_size: 16,
            llm: LlmSettings::default(),
            examples_count: 2,
            speech: None,
            media_root: PathBuf::from("media"),
            media_url: "/media/".to_string(),
            public_url: None,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable lookup
    ///
    /// Unset and empty variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let provider = match get("VOCAB_LLM_PROVIDER") {
            Some(value) => ProviderKind::from_str(&value).map_err(|e| ConfigError::InvalidValue {
                name: "VOCAB_LLM_PROVIDER",
                value,
                reason: e.to_string(),
            })?,
            None => defaults.llm.provider,
        };

        let deepseek_defaults = DeepSeekSettings::default();
        let deepseek = DeepSeekSettings {
            api_key: get("DEEPSEEK_API_KEY"),
            base_url: get("DEEPSEEK_API_BASE_URL").unwrap_or(deepseek_defaults.base_url),
            model: get("DEEPSEEK_MODEL").unwrap_or(deepseek_defaults.model),
        };

        let gigachat_defaults = GigaChatSettings::default();
        let gigachat = GigaChatSettings {
            auth_key: get("GIGACHAT_AUTH_KEY"),
            scope: get("GIGACHAT_SCOPE").unwrap_or(gigachat_defaults.scope),
            auth_url: get("GIGACHAT_AUTH_URL").unwrap_or(gigachat_defaults.auth_url),
            api_url: get("GIGACHAT_API_URL").unwrap_or(gigachat_defaults.api_url),
            model: get("GIGACHAT_MODEL").unwrap_or(gigachat_defaults.model),
            verify_ssl_certs: parse_or(
                "GIGACHAT_VERIFY_SSL_CERTS",
                get("GIGACHAT_VERIFY_SSL_CERTS"),
                gigachat_defaults.verify_ssl_certs,
                parse_bool,
            )?,
            ca_bundle: get("GIGACHAT_CA_BUNDLE").map(PathBuf::from),
        };

        let speech = get("TTS_API_KEY").map(|api_key| {
            let mut settings = SpeechSettings::new(api_key);
            if let Some(base_url) = get("TTS_BASE_URL") {
                settings.base_url = base_url;
            }
            if let Some(model) = get("TTS_MODEL") {
                settings.model = model;
            }
            if let Some(voice) = get("TTS_VOICE") {
                settings.voice = voice;
            }
            settings
        });

        Ok(Self {
            bind_addr: parse_or(
                "VOCAB_BIND_ADDR",
                get("VOCAB_BIND_ADDR"),
                defaults.bind_addr,
                |v| v.parse().map_err(|e: std::net::AddrParseError| e.to_string()),
            )?,
            database_url: get("DATABASE_URL"),
            pool_size: parse_or(
                "DATABASE_POOL_SIZE",
                get("DATABASE_POOL_SIZE"),
                defaults.pool_size,
                parse_positive,
            )?,
            llm: LlmSettings {
                provider,
                deepseek,
                gigachat,
                ..defaults.llm
            },
            examples_count: parse_or(
                "VOCAB_EXAMPLES_COUNT",
                get("VOCAB_EXAMPLES_COUNT"),
                defaults.examples_count,
                parse_positive,
            )?,
            speech,
            media_root: get("MEDIA_ROOT").map(PathBuf::from).unwrap_or(defaults.media_root),
            media_url: get("MEDIA_URL").unwrap_or(defaults.media_url),
            public_url: get("VOCAB_PUBLIC_URL")
                .map(|value| parse_public_url("VOCAB_PUBLIC_URL", value))
                .transpose()?,
        })
    }
}

fn parse_public_url(name: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidValue {
            name,
            reason: "expected an http:// or https:// URL".to_string(),
            value,
        })
    }
}

fn parse_or<T>(
    name: &'static str,
    value: Option<String>,
    default: T,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => parse(value.trim()).map_err(|reason| ConfigError::InvalidValue {
            name,
            value,
            reason,
        }),
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}

fn parse_positive(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
