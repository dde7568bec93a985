//! REST transport module
//!
//! Executes prepared requests against a base URL.
//!
//! # Features
//!
//! - **Bounded Retries**: transient failures retried with configurable backoff
//! - **Client Caching**: one lazily-created client per distinct base URL
//! - **Test Double**: in-memory transport with the same capability interface

mod memory;
mod request;
mod rest;

pub use memory::{ExecutedRequest, InMemoryTransport};
pub use request::{ApiRequest, RawResponse};
pub use rest::{HttpTransport, RestTransport, TransportConfig, TransportConfigBuilder};
