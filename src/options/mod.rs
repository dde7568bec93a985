//! Options module
//!
//! Typed client configuration plus the generic fluent builder that
//! produces it.

mod builder;
mod types;

pub use builder::OptionsBuilder;
pub use types::{ApiClientOptions, ClientOptions, DEFAULT_MAX_RETRY_COUNT, DEFAULT_TIMEOUT};
