//! Response envelope types
//!
//! Every client call produces an `ApiResult<T>`: the transport status paired
//! with an `ApiResponse<T>` envelope. The envelope's wire shape is
//! `{"result": <T|null>, "errors": [{"code","message","detail"}]}`; the
//! status travels alongside on the transport response, not embedded.

use crate::transport::RawResponse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Error code used when a response body cannot be parsed as an envelope
pub const DESERIALIZATION_FAILED: &str = "deserialization_failed";

/// Error code used when an error is synthesized from a bare HTTP status
pub const HTTP_ERROR: &str = "http_error";

/// A single structured error inside the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Optional additional detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    /// Create an error with a code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            detail: None,
        }
    }

    /// Attach additional detail
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Uniform success/error wrapper for any payload type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// HTTP status code, carried alongside the wire body
    #[serde(skip)]
    pub status: u16,
    /// The payload, when the call succeeded
    pub result: Option<T>,
    /// Structured errors, in the order the remote API reported them
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

impl<T> ApiResponse<T> {
    /// Create an empty envelope with the given status
    pub fn new(status: u16) -> Self {
        Self {
            status,
            result: None,
            errors: Vec::new(),
        }
    }

    /// Create a success envelope carrying a payload
    pub fn success(status: u16, result: T) -> Self {
        Self {
            status,
            result: Some(result),
            errors: Vec::new(),
        }
    }

    /// Create a failure envelope carrying errors
    pub fn failure(status: u16, errors: Vec<ApiError>) -> Self {
        Self {
            status,
            result: None,
            errors,
        }
    }

    /// Create a failure envelope carrying a single error
    pub fn from_error(status: u16, error: ApiError) -> Self {
        Self::failure(status, vec![error])
    }

    /// Whether the status is in the success range and no errors were reported
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.errors.is_empty()
    }

    /// Whether the status is 404, regardless of errors
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Thin carrier pairing a transport status with an envelope
///
/// Produced exactly once per client call and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ApiResult<T> {
    /// HTTP status code of the transport round trip
    pub status: u16,
    /// The mapped envelope
    pub response: ApiResponse<T>,
}

impl<T> ApiResult<T> {
    /// Pair a status with an envelope
    pub fn from_parts(status: u16, response: ApiResponse<T>) -> Self {
        Self { status, response }
    }

    /// Whether the call succeeded
    pub fn is_success(&self) -> bool {
        self.response.is_success()
    }

    /// Whether the remote resource was not found
    pub fn is_not_found(&self) -> bool {
        self.response.is_not_found()
    }

    /// The payload, if any
    pub fn result(&self) -> Option<&T> {
        self.response.result.as_ref()
    }

    /// Consume the carrier and take the payload
    pub fn into_result(self) -> Option<T> {
        self.response.result
    }

    /// The reported errors
    pub fn errors(&self) -> &[ApiError] {
        &self.response.errors
    }
}

impl<T: DeserializeOwned> ApiResult<T> {
    /// Map a raw transport response into the uniform envelope
    ///
    /// This is the one place where malformed upstream output is normalized:
    /// it never fails, whatever the body contains.
    pub fn from_raw(raw: &RawResponse) -> Self {
        let status = raw.status;
        let success = raw.is_success();

        let response = if raw.body.is_empty() {
            if success {
                ApiResponse::new(status)
            } else {
                ApiResponse::from_error(status, status_error(status, None))
            }
        } else if raw.is_json() {
            match serde_json::from_slice::<ApiResponse<T>>(&raw.body) {
                Ok(mut envelope) => {
                    envelope.status = status;
                    // A non-success envelope always names at least one error
                    if !success && envelope.errors.is_empty() {
                        envelope.errors.push(status_error(status, None));
                    }
                    envelope
                }
                Err(e) => ApiResponse::from_error(
                    status,
                    ApiError::new(
                        DESERIALIZATION_FAILED,
                        "response body could not be parsed as an envelope",
                    )
                    .with_detail(e.to_string()),
                ),
            }
        } else if success {
            ApiResponse::from_error(
                status,
                ApiError::new(
                    DESERIALIZATION_FAILED,
                    format!(
                        "expected a JSON envelope, got content type '{}'",
                        raw.content_type().unwrap_or("unknown")
                    ),
                ),
            )
        } else {
            ApiResponse::from_error(status, status_error(status, Some(raw.body_text())))
        };

        Self { status, response }
    }
}

/// Synthesize an error from a bare status code and its canonical reason
fn status_error(status: u16, detail: Option<String>) -> ApiError {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("HTTP error");
    let mut error = ApiError::new(HTTP_ERROR, format!("{status} {reason}"));
    if let Some(detail) = detail {
        error = error.with_detail(detail);
    }
    error
}
