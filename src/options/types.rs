//! Client options types
//!
//! Options are constructed through a builder, then frozen: the client
//! consumes them at construction time and they are never mutated afterwards.

use crate::auth::AuthenticationOptions;
use crate::error::{require_non_empty, Error, Result};
use std::time::Duration;

/// Default retry budget for transient failures
pub const DEFAULT_MAX_RETRY_COUNT: u32 = 3;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Base configuration for a typed API client
#[derive(Debug, Clone)]
pub struct ApiClientOptions {
    /// Base URL all requests are executed against (required, non-empty)
    pub base_url: String,
    /// Optional segment prepended to every resource path
    pub api_path_prefix: Option<String>,
    /// Retry budget for transient failures
    pub max_retry_count: u32,
    /// Request timeout
    pub timeout: Duration,
    /// Active authentication variant
    pub authentication: AuthenticationOptions,
}

impl ApiClientOptions {
    /// Create options for a base URL, everything else defaulted
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        require_non_empty("base_url", &base_url)?;
        Ok(Self {
            base_url,
            api_path_prefix: None,
            max_retry_count: DEFAULT_MAX_RETRY_COUNT,
            timeout: DEFAULT_TIMEOUT,
            authentication: AuthenticationOptions::None,
        })
    }

    /// Start a builder for a base URL
    pub fn builder(base_url: impl Into<String>) -> Result<super::OptionsBuilder<Self>> {
        Ok(super::OptionsBuilder::new(Self::with_base_url(base_url)?))
    }

    /// Read options from `RESTKIT_*` environment variables
    ///
    /// `RESTKIT_BASE_URL` is required; `RESTKIT_API_PATH_PREFIX`,
    /// `RESTKIT_MAX_RETRY_COUNT`, `RESTKIT_TIMEOUT_SECS`, and
    /// `RESTKIT_API_KEY` are optional.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("RESTKIT_BASE_URL")
            .map_err(|_| Error::config("RESTKIT_BASE_URL is not set"))?;
        let mut options = Self::with_base_url(base_url)?;

        if let Ok(prefix) = std::env::var("RESTKIT_API_PATH_PREFIX") {
            require_non_empty("RESTKIT_API_PATH_PREFIX", &prefix)?;
            options.api_path_prefix = Some(prefix);
        }
        if let Ok(count) = std::env::var("RESTKIT_MAX_RETRY_COUNT") {
            options.max_retry_count = count.parse().map_err(|_| {
                Error::config(format!("RESTKIT_MAX_RETRY_COUNT is not a number: {count}"))
            })?;
        }
        if let Ok(secs) = std::env::var("RESTKIT_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::config(format!("RESTKIT_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            options.timeout = Duration::from_secs(secs);
        }
        if let Ok(key) = std::env::var("RESTKIT_API_KEY") {
            options.authentication = AuthenticationOptions::api_key(key)?;
        }

        Ok(options)
    }
}

/// Access to the embedded base options
///
/// Concrete options types embed `ApiClientOptions` and implement this trait;
/// the generic builder's fluent methods go through it, so one builder serves
/// every options type.
pub trait ClientOptions: Sized {
    /// The embedded base options
    fn base(&self) -> &ApiClientOptions;

    /// Mutable access to the embedded base options
    fn base_mut(&mut self) -> &mut ApiClientOptions;
}

impl ClientOptions for ApiClientOptions {
    fn base(&self) -> &ApiClientOptions {
        self
    }

    fn base_mut(&mut self) -> &mut ApiClientOptions {
        self
    }
}
