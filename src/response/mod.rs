//! Response envelope module
//!
//! The uniform `{result, errors, status}` wrapper returned by every client
//! call, and the mapping that normalizes raw transport responses into it.

mod types;

pub use types::{ApiError, ApiResponse, ApiResult, DESERIALIZATION_FAILED, HTTP_ERROR};

#[cfg(test)]
mod tests;
