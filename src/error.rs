//! Error types for restkit
//!
//! This module defines the error hierarchy for the entire toolkit.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Ordinary HTTP error statuses (4xx/5xx) are not errors: they travel back
//! inside the response envelope. Only configuration mistakes, authentication
//! failures, and unrecoverable transport faults surface as `Error`.

use thiserror::Error;

/// The main error type for restkit
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    #[error("Audience '{audience}' requires a token provider, but none was supplied")]
    MissingTokenProvider { audience: String },

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Token exchange failed: {message}")]
    TokenExchange { message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Transport has been shut down")]
    TransportClosed,

    // ============================================================================
    // Serialization Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a token exchange error
    pub fn token_exchange(message: impl Into<String>) -> Self {
        Self::TokenExchange {
            message: message.into(),
        }
    }

    /// Check if this error is retryable at the transport layer
    ///
    /// Only network-level faults qualify. Retryable HTTP statuses are
    /// classified on the response itself, before it is ever turned into
    /// an error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Timeout { .. })
    }
}

/// Result type alias for restkit
pub type Result<T> = std::result::Result<T, Error>;

/// Validate that a string argument is non-empty (whitespace counts as empty)
pub(crate) fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::invalid_argument(name, "must not be empty"))
    } else {
        Ok(())
    }
}

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
