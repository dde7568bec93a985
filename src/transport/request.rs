//! Request and response primitives for the transport layer
//!
//! `ApiRequest` is the logical request the client layer prepares, and
//! `RawResponse` is the transport's answer: status, headers, and body,
//! with no interpretation applied.

use crate::error::Result;
use crate::types::{JsonValue, Method, StringMap};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A prepared request, ready to be executed against a base URL
///
/// The resource path is relative; the transport combines it with the base
/// URL it is given at execution time.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Resource path relative to the base URL (prefix already applied)
    pub resource_path: String,
    /// Query parameters
    pub query: StringMap,
    /// Request headers
    pub headers: StringMap,
    /// Request body (JSON)
    pub body: Option<JsonValue>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Retry budget for transient failures
    pub max_retries: Option<u32>,
}

impl ApiRequest {
    /// Create a new request for a resource path
    pub fn new(method: Method, resource_path: impl Into<String>) -> Self {
        Self {
            method,
            resource_path: resource_path.into(),
            ..Self::default()
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the retry budget for transient failures
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Look up a header by name (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A raw transport response: status, headers, body
///
/// HTTP error statuses are carried here as data, never raised as errors.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers (names lowercased)
    pub headers: StringMap,
    /// Response body
    pub body: Bytes,
}

impl RawResponse {
    /// Create an empty response with the given status
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: StringMap::new(),
            body: Bytes::new(),
        }
    }

    /// Create a JSON response with the given status and body
    pub fn json(status: u16, body: &JsonValue) -> Self {
        let bytes = serde_json::to_vec(body).expect("serializing a JSON value cannot fail");
        Self::new(status)
            .with_header("content-type", "application/json")
            .with_body(bytes)
    }

    /// Create a plain-text response with the given status and body
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("content-type", "text/plain")
            .with_body(body.into().into_bytes())
    }

    /// Set the body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into().to_lowercase(), value.into());
        self
    }

    /// Build from a reqwest response, consuming its body
    pub async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Whether the status is in the success range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Look up a header by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// The content type, if any
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Whether the body is JSON per the content type
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.contains("json"))
    }

    /// The body as lossily-decoded text
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
