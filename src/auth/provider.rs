//! Token providers
//!
//! A token provider resolves a bearer token for a given audience. The
//! production implementation exchanges client credentials at a token
//! endpoint and caches tokens per audience until they near expiry.

use super::types::CachedToken;
use crate::error::{require_non_empty, Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Capability interface for resolving a bearer token for an audience
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Resolve an access token scoped to the given audience
    async fn get_access_token(&self, audience: &str) -> Result<String>;
}

/// A recorded token resolution call
#[derive(Debug, Clone)]
pub struct TokenRequest {
    /// The audience the token was requested for
    pub audience: String,
    /// When the request was made
    pub timestamp: DateTime<Utc>,
}

/// Token provider using the OAuth2 client credentials flow
///
/// Tokens are requested with scope `{audience}/.default` and cached per
/// audience. Refresh happens under a write lock with a double-check so
/// concurrent callers fetch at most once.
pub struct ClientCredentialsTokenProvider {
    token_url: String,
    client_id: String,
    client_secret: String,
    http_client: Client,
    cache: RwLock<HashMap<String, CachedToken>>,
}

impl ClientCredentialsTokenProvider {
    /// Create a provider for a token endpoint
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        Self::with_client(token_url, client_id, client_secret, Client::new())
    }

    /// Create a provider with a custom HTTP client
    pub fn with_client(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        http_client: Client,
    ) -> Result<Self> {
        let token_url = token_url.into();
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        require_non_empty("token_url", &token_url)?;
        require_non_empty("client_id", &client_id)?;
        require_non_empty("client_secret", &client_secret)?;

        Ok(Self {
            token_url,
            client_id,
            client_secret,
            http_client,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Clear all cached tokens (useful for testing or forced refresh)
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
    }

    /// Fetch a fresh token for an audience from the token endpoint
    async fn fetch_token(&self, audience: &str) -> Result<CachedToken> {
        let scope = format!("{audience}/.default");
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("scope", &scope),
        ];

        debug!(audience, "requesting access token");
        let response = self
            .http_client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::token_exchange(format!(
                "Token request failed with status {status}: {body}"
            )));
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        Ok(token_response.into_cached_token())
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsTokenProvider {
    async fn get_access_token(&self, audience: &str) -> Result<String> {
        require_non_empty("audience", audience)?;
        let key = audience.to_lowercase();

        // Fast path: valid cached token
        {
            let cache = self.cache.read().await;
            if let Some(token) = cache.get(&key) {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        // Need to refresh - acquire write lock
        let mut cache = self.cache.write().await;

        // Double-check after acquiring write lock (another task might have refreshed)
        if let Some(token) = cache.get(&key) {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_token(audience).await?;
        let token_str = new_token.token.clone();
        cache.insert(key, new_token);

        Ok(token_str)
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}
