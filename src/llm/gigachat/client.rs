//! GigaChat client implementation

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::{Certificate, Client};

use crate::llm::chat::{completions_url, stream_chat_completion};
use crate::llm::core::{
    error::LlmError,
    provider::{EventStream, LlmProvider},
    types::GenerateRequest,
};

use super::auth::TokenManager;

pub const DEFAULT_AUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";
pub const DEFAULT_API_URL: &str = "https://gigachat.devices.sberbank.ru/api/v1";
pub const DEFAULT_SCOPE: &str = "GIGACHAT_API_PERS";
pub const DEFAULT_MODEL: &str = "GigaChat";

/// Connection settings for GigaChat
#[derive(Debug, Clone)]
pub struct GigaChatSettings {
    /// Base64 authorization key (`GIGACHAT_AUTH_KEY`)
    pub auth_key: Option<String>,
    /// API scope (`GIGACHAT_SCOPE`)
    pub scope: String,
    /// OAuth endpoint (`GIGACHAT_AUTH_URL`)
    pub auth_url: String,
    /// API base URL (`GIGACHAT_API_URL`)
    pub api_url: String,
    /// Model identifier (`GIGACHAT_MODEL`)
    pub model: String,
    /// The endpoints use certificates from the Russian national CA, which
    /// is absent from most trust stores (`GIGACHAT_VERIFY_SSL_CERTS`)
    pub verify_ssl_certs: bool,
    /// PEM bundle with extra root certificates, e.g. the national CA
    /// (`GIGACHAT_CA_BUNDLE`)
    pub ca_bundle: Option<PathBuf>,
}

impl Default for GigaChatSettings {
    fn default() -> Self {
        Self {
            auth_key: None,
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            verify_ssl_certs: true,
            ca_bundle: None,
        }
    }
}

/// Client for GigaChat chat completions
pub struct GigaChatClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Access token cache
    token_manager: TokenManager,
    api_url: String,
    model: String,
}

impl GigaChatClient {
    /// Create a new GigaChat client
    ///
    /// No network traffic happens here; the first request exchanges the
    /// authorization key.
    ///
    /// # Errors
    ///
    /// Returns an error if no authorization key is configured or the HTTP
    /// client cannot be built.
    pub fn new(settings: GigaChatSettings) -> Result<Self, LlmError> {
        let auth_key = settings
            .auth_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                LlmError::AuthenticationError("GIGACHAT_AUTH_KEY is not set".to_string())
            })?;

        let mut builder = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .danger_accept_invalid_certs(!settings.verify_ssl_certs);

        if let Some(path) = &settings.ca_bundle {
            for certificate in load_ca_bundle(path)? {
                builder = builder.add_root_certificate(certificate);
            }
            log::info!("GigaChat trusts extra roots from {}", path.display());
        }

        let http_client = builder
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        if !settings.verify_ssl_certs {
            log::warn!("GigaChat TLS certificate verification is disabled");
        }

        let token_manager = TokenManager::new(
            http_client.clone(),
            settings.auth_url,
            auth_key,
            settings.scope,
        );

        Ok(Self {
            http_client,
            token_manager,
            api_url: settings.api_url,
            model: settings.model,
        })
    }

    /// Build the endpoint URL for streaming
    fn build_endpoint_url(&self) -> String {
        completions_url(&self.api_url)
    }
}

#[async_trait]
impl LlmProvider for GigaChatClient {
    fn name(&self) -> &str {
        "gigachat"
    }

    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError> {
        let token = self.token_manager.get_token().await?;
        let url = self.build_endpoint_url();
        stream_chat_completion(&self.http_client, &url, &token, &self.model, request).await
    }
}

/// Read every certificate in a PEM file
fn load_ca_bundle(path: &Path) -> Result<Vec<Certificate>, LlmError> {
    let pem = std::fs::read(path).map_err(|e| {
        LlmError::ConfigurationError(format!("cannot read {}: {}", path.display(), e))
    })?;

    let certificates = Certificate::from_pem_bundle(&pem).map_err(|e| {
        LlmError::ConfigurationError(format!("invalid PEM in {}: {}", path.display(), e))
    })?;
    if certificates.is_empty() {
        return Err(LlmError::ConfigurationError(format!(
            "no certificates in {}",
            path.display()
        )));
    }
    Ok(certificates)
}
