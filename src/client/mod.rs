//! Base API client module
//!
//! Composes options, transport, and token resolution into the typed
//! request/execute/map pipeline.

mod base;

pub use base::ApiClient;
