//! In-memory transport for tests
//!
//! Never performs network I/O. Resource paths are matched case-insensitively
//! against registered fixed responses, then registered responder functions,
//! then a default response, then a synthesized 404 naming the resource.
//! Every executed request is recorded for later assertion.

use super::request::{ApiRequest, RawResponse};
use super::rest::RestTransport;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&ApiRequest) -> RawResponse + Send + Sync>;

/// A request the in-memory transport has executed
#[derive(Debug, Clone)]
pub struct ExecutedRequest {
    /// The base URL the request targeted
    pub base_url: String,
    /// The request as received
    pub request: ApiRequest,
}

#[derive(Default)]
struct InMemoryState {
    responses: HashMap<String, RawResponse>,
    responders: HashMap<String, Responder>,
    default_response: Option<RawResponse>,
    requests: Vec<ExecutedRequest>,
}

/// In-memory test double for `RestTransport`
#[derive(Default)]
pub struct InMemoryTransport {
    state: Mutex<InMemoryState>,
}

impl InMemoryTransport {
    /// Create an empty in-memory transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed response for a resource path
    pub fn register_response(&self, resource_path: &str, response: RawResponse) {
        let mut state = self.lock();
        state.responses.insert(normalize_path(resource_path), response);
    }

    /// Register a JSON response for a resource path
    pub fn register_json(&self, resource_path: &str, status: u16, body: &serde_json::Value) {
        self.register_response(resource_path, RawResponse::json(status, body));
    }

    /// Register a responder function for a resource path
    ///
    /// Responders are consulted only when no fixed response matches.
    pub fn register_responder<F>(&self, resource_path: &str, responder: F)
    where
        F: Fn(&ApiRequest) -> RawResponse + Send + Sync + 'static,
    {
        let mut state = self.lock();
        state
            .responders
            .insert(normalize_path(resource_path), Box::new(responder));
    }

    /// Set the response returned when no registration matches
    pub fn set_default_response(&self, response: RawResponse) {
        self.lock().default_response = Some(response);
    }

    /// All requests executed so far, in order
    pub fn requests(&self) -> Vec<ExecutedRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests executed so far
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Number of executed requests targeting a resource path
    pub fn request_count_for(&self, resource_path: &str) -> usize {
        let key = normalize_path(resource_path);
        self.lock()
            .requests
            .iter()
            .filter(|r| normalize_path(&r.request.resource_path) == key)
            .count()
    }

    /// Remove all registrations and recorded requests
    pub fn clear(&self) {
        let mut state = self.lock();
        state.responses.clear();
        state.responders.clear();
        state.default_response = None;
        state.requests.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        self.state.lock().expect("in-memory transport lock poisoned")
    }
}

impl std::fmt::Debug for InMemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("InMemoryTransport")
            .field("responses", &state.responses.len())
            .field("responders", &state.responders.len())
            .field("requests", &state.requests.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RestTransport for InMemoryTransport {
    async fn execute(&self, base_url: &str, request: &ApiRequest) -> Result<RawResponse> {
        let mut state = self.lock();
        state.requests.push(ExecutedRequest {
            base_url: base_url.to_string(),
            request: request.clone(),
        });

        let key = normalize_path(&request.resource_path);

        if let Some(response) = state.responses.get(&key) {
            return Ok(response.clone());
        }
        if let Some(responder) = state.responders.get(&key) {
            return Ok(responder(request));
        }
        if let Some(response) = &state.default_response {
            return Ok(response.clone());
        }

        Ok(not_found(&request.resource_path))
    }
}

/// Trim slashes and lowercase for case-insensitive path matching
fn normalize_path(path: &str) -> String {
    path.trim_matches('/').to_lowercase()
}

/// Synthesized 404 envelope naming the unmatched resource
fn not_found(resource_path: &str) -> RawResponse {
    RawResponse::json(
        404,
        &json!({
            "result": null,
            "errors": [{
                "code": "not_found",
                "message": format!("No response registered for resource '{resource_path}'"),
            }],
        }),
    )
}
