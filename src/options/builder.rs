//! Generic options builder
//!
//! The builder owns exactly one options value for its lifetime. Fluent
//! methods validate eagerly, mutate the owned value in place, and return the
//! builder for chaining; methods whose argument can be invalid return
//! `Result<Self>` so chains compose with `?`. `build()` performs no further
//! validation and hands the options over, ending the builder's
//! responsibility.

use super::types::ClientOptions;
use crate::auth::AuthenticationOptions;
use crate::error::{require_non_empty, Error, Result};
use std::time::Duration;

/// Fluent mutator for an options value
///
/// Generic over the produced options type; extension methods for a concrete
/// options type live in `impl OptionsBuilder<ConcreteOptions>` blocks and
/// only touch the fields that type adds.
#[derive(Debug)]
pub struct OptionsBuilder<O> {
    options: O,
}

impl<O: ClientOptions> OptionsBuilder<O> {
    /// Wrap an options value for fluent configuration
    pub fn new(options: O) -> Self {
        Self { options }
    }

    /// The options being built, for extension methods
    pub fn options_mut(&mut self) -> &mut O {
        &mut self.options
    }

    /// Set the path segment prepended to every resource path
    pub fn with_api_path_prefix(mut self, prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        require_non_empty("api_path_prefix", &prefix)?;
        self.options.base_mut().api_path_prefix = Some(prefix);
        Ok(self)
    }

    /// Set the retry budget for transient failures
    pub fn with_max_retry_count(mut self, count: u32) -> Self {
        self.options.base_mut().max_retry_count = count;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::invalid_argument("timeout", "must be non-zero"));
        }
        self.options.base_mut().timeout = timeout;
        Ok(self)
    }

    /// Set the authentication variant directly
    pub fn with_authentication(mut self, authentication: AuthenticationOptions) -> Self {
        self.options.base_mut().authentication = authentication;
        self
    }

    /// Authenticate with an API key in the default header
    pub fn with_api_key_authentication(self, api_key: impl Into<String>) -> Result<Self> {
        let auth = AuthenticationOptions::api_key(api_key)?;
        Ok(self.with_authentication(auth))
    }

    /// Authenticate with an API key in a custom header
    pub fn with_api_key_authentication_header(
        self,
        api_key: impl Into<String>,
        header_name: impl Into<String>,
    ) -> Result<Self> {
        let auth = AuthenticationOptions::api_key_with_header(api_key, header_name)?;
        Ok(self.with_authentication(auth))
    }

    /// Authenticate with a bearer token scoped to an audience
    pub fn with_token_audience_authentication(self, audience: impl Into<String>) -> Result<Self> {
        let auth = AuthenticationOptions::token_audience(audience)?;
        Ok(self.with_authentication(auth))
    }

    /// Finish building and return the options
    pub fn build(self) -> O {
        self.options
    }
}
