//! Authentication module
//!
//! Supports: API Key headers and audience-scoped bearer tokens.
//!
//! Token resolution is a capability interface (`TokenProvider`) with a
//! production client-credentials implementation and a deterministic fake
//! for tests.

mod fake;
mod provider;
mod types;

pub use fake::{FakeTokenProvider, FALLBACK_TOKEN};
pub use provider::{ClientCredentialsTokenProvider, TokenProvider, TokenRequest};
pub use types::{AuthenticationOptions, CachedToken, DEFAULT_API_KEY_HEADER};

#[cfg(test)]
mod tests;
