//! # restkit
//!
//! A minimal, Rust-native toolkit for building and consuming REST APIs
//! consistently.
//!
//! ## Features
//!
//! - **Response Envelope**: uniform `{result, errors}` wrapper for any payload
//! - **Options + Builder**: fluent, eagerly-validated client configuration
//! - **Pluggable Auth**: API key headers or audience-scoped bearer tokens
//! - **Bounded Retries**: transport-level retry with configurable backoff
//! - **Test Doubles**: in-memory transport and fake token provider with the
//!   same capability interfaces as production
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restkit::{ApiClient, ApiClientOptions, HttpTransport, Result};
//! use std::sync::Arc;
//!
//! #[derive(serde::Deserialize)]
//! struct User { id: u64, name: String }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let options = ApiClientOptions::builder("https://api.example.com")?
//!         .with_api_path_prefix("v1")?
//!         .with_max_retry_count(5)
//!         .with_api_key_authentication("k1")?
//!         .build();
//!
//!     let client = ApiClient::new(options, Arc::new(HttpTransport::new()))?;
//!
//!     let user = client.get::<User>("users/123").await?;
//!     if user.is_success() {
//!         // use user.result()
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! caller → ApiClient::create_request ──> attach auth header (TokenProvider)
//!               │
//!               └──> RestTransport::execute (base URL + bounded retry)
//!                          │
//!                          └──> RawResponse ──> ApiResult<T> envelope
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the toolkit
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication variants and token providers
pub mod auth;

/// REST transport with retry and the in-memory double
pub mod transport;

/// Response envelope and raw-response mapping
pub mod response;

/// Client options and the generic fluent builder
pub mod options;

/// The base API client pipeline
pub mod client;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, ResultExt};
pub use types::{BackoffType, JsonValue, Method, StringMap};

pub use auth::{
    AuthenticationOptions, ClientCredentialsTokenProvider, FakeTokenProvider, TokenProvider,
    TokenRequest, DEFAULT_API_KEY_HEADER, FALLBACK_TOKEN,
};
pub use client::ApiClient;
pub use options::{ApiClientOptions, ClientOptions, OptionsBuilder};
pub use response::{ApiError, ApiResponse, ApiResult};
pub use transport::{
    ApiRequest, HttpTransport, InMemoryTransport, RawResponse, RestTransport, TransportConfig,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
