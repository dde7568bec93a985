//! Authentication option types
//!
//! A closed set of variants: the base client branches exhaustively on which
//! header-construction strategy to apply. Exactly one variant is active per
//! options instance.

use crate::error::{require_non_empty, Result};
use chrono::{DateTime, Utc};

/// Default header name for API key authentication
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

/// Authentication configuration for a client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthenticationOptions {
    /// No authentication
    #[default]
    None,

    /// API key sent in a header
    ApiKey {
        /// The API key value
        api_key: String,
        /// Header to carry the key
        header_name: String,
    },

    /// Bearer token resolved from a token provider for an audience
    TokenAudience {
        /// Logical identifier of the remote API the token is scoped to
        audience: String,
    },
}

impl AuthenticationOptions {
    /// API key authentication with the default header name
    ///
    /// An empty or whitespace-only key is rejected.
    pub fn api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::api_key_with_header(api_key, DEFAULT_API_KEY_HEADER)
    }

    /// API key authentication with a custom header name
    pub fn api_key_with_header(
        api_key: impl Into<String>,
        header_name: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        let header_name = header_name.into();
        require_non_empty("api_key", &api_key)?;
        require_non_empty("header_name", &header_name)?;
        Ok(Self::ApiKey {
            api_key,
            header_name,
        })
    }

    /// Bearer token authentication scoped to an audience
    pub fn token_audience(audience: impl Into<String>) -> Result<Self> {
        let audience = audience.into();
        require_non_empty("audience", &audience)?;
        Ok(Self::TokenAudience { audience })
    }

    /// Whether no authentication is configured
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = never expires
        }
    }
}
