//! GigaChat OAuth token exchange

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::llm::core::error::{error_from_response, LlmError};

/// Tokens are refreshed this long before they expire
const REFRESH_MARGIN_SECS: i64 = 60;

/// Response body of the OAuth endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Expiry as Unix milliseconds
    pub expires_at: i64,
}

/// A cached access token
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn from_response(response: TokenResponse) -> Result<Self, LlmError> {
        let expires_at = DateTime::from_timestamp_millis(response.expires_at).ok_or_else(|| {
            LlmError::AuthenticationError(format!(
                "Token expiry out of range: {}",
                response.expires_at
            ))
        })?;

        Ok(Self {
            value: response.access_token,
            expires_at,
        })
    }

    /// Whether the token can still be used at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Exchanges the GigaChat authorization key for access tokens
///
/// The token is cached and exchanged again shortly before it expires.
/// Concurrent callers wait on the same exchange.
pub struct TokenManager {
    http_client: Client,
    auth_url: String,
    auth_key: String,
    scope: String,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    pub fn new(http_client: Client, auth_url: String, auth_key: String, scope: String) -> Self {
        Self {
            http_client,
            auth_url,
            auth_key,
            scope,
            cached: Mutex::new(None),
        }
    }

    /// Get a valid access token, exchanging the key when needed
    ///
    /// # Errors
    /// Returns `AuthenticationError` when the key is rejected.
    pub async fn get_token(&self) -> Result<String, LlmError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.exchange().await?;
        log::debug!("GigaChat token refreshed, expires at {}", token.expires_at);
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn exchange(&self) -> Result<AccessToken, LlmError> {
        let response = self
            .http_client
            .post(&self.auth_url)
            .header("Authorization", format!("Basic {}", self.auth_key))
            .header("RqUID", Uuid::new_v4().to_string())
            .header("Accept", "application/json")
            .form(&[("scope", self.scope.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::AuthenticationError(format!(
                "GigaChat rejected the authorization key ({}): {}",
                status.as_u16(),
                body
            )));
        }
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let body: TokenResponse = response.json().await?;
        AccessToken::from_response(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_deserialization() {
        let json = r#"{"access_token":"eyJhbGci","expires_at":1706026848841}"#;
        let response: TokenResponse = serde_json::from_str(json).unwrap();
        let token = AccessToken::from_response(response).unwrap();

        assert_eq!(token.value, "eyJhbGci");
        assert_eq!(token.expires_at.timestamp_millis(), 1706026848841);
    }

    #[test]
    fn test_token_freshness_respects_margin() {
        let now = Utc::now();
        let token = AccessToken {
            value: "t".to_string(),
            expires_at: now + Duration::minutes(30),
        };
        assert!(token.is_fresh(now));

        let almost_expired = AccessToken {
            value: "t".to_string(),
            expires_at: now + Duration::seconds(30),
        };
        assert!(!almost_expired.is_fresh(now));
    }

    #[tokio::test]
    #[ignore] // Requires GIGACHAT_AUTH_KEY
    async fn test_live_token_exchange() {
        dotenvy::dotenv().ok();
        let auth_key = std::env::var("GIGACHAT_AUTH_KEY").expect("GIGACHAT_AUTH_KEY required");
        let manager = TokenManager::new(
            Client::new(),
            super::super::client::DEFAULT_AUTH_URL.to_string(),
            auth_key,
            super::super::client::DEFAULT_SCOPE.to_string(),
        );

        let token = manager.get_token().await.expect("Failed to exchange key");
        assert!(!token.is_empty());

        // Second call is served from the cache
        let again = manager.get_token().await.unwrap();
        assert_eq!(token, again);
    }
}
