//! Deterministic fake token provider for tests
//!
//! Resolution order: exact audience match (case-insensitive), then the
//! default token, then a fixed fallback. Every resolution call is logged,
//! whichever branch it takes.

use super::provider::{TokenProvider, TokenRequest};
use crate::error::{require_non_empty, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

/// Token returned when neither a registered token nor a default matches
pub const FALLBACK_TOKEN: &str = "fake-test-token";

#[derive(Debug, Default)]
struct FakeState {
    tokens: HashMap<String, String>,
    default_token: Option<String>,
    log: Vec<TokenRequest>,
}

/// In-memory test double for `TokenProvider`
#[derive(Debug, Default)]
pub struct FakeTokenProvider {
    state: Mutex<FakeState>,
}

impl FakeTokenProvider {
    /// Create an empty fake provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for an audience (case-insensitive)
    ///
    /// Empty audiences and tokens are rejected.
    pub fn register_token(&self, audience: &str, token: &str) -> Result<()> {
        require_non_empty("audience", audience)?;
        require_non_empty("token", token)?;
        self.lock()
            .tokens
            .insert(audience.to_lowercase(), token.to_string());
        Ok(())
    }

    /// Set the token returned for audiences with no registration
    pub fn set_default_token(&self, token: &str) -> Result<()> {
        require_non_empty("token", token)?;
        self.lock().default_token = Some(token.to_string());
        Ok(())
    }

    /// All resolution calls made so far, in order
    pub fn requests(&self) -> Vec<TokenRequest> {
        self.lock().log.clone()
    }

    /// Number of resolution calls made for an audience (case-insensitive)
    pub fn request_count(&self, audience: &str) -> usize {
        self.lock()
            .log
            .iter()
            .filter(|r| r.audience.eq_ignore_ascii_case(audience))
            .count()
    }

    /// Empty the token mapping and the request log
    pub fn clear(&self) {
        let mut state = self.lock();
        state.tokens.clear();
        state.log.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake provider lock poisoned")
    }
}

#[async_trait]
impl TokenProvider for FakeTokenProvider {
    async fn get_access_token(&self, audience: &str) -> Result<String> {
        let mut state = self.lock();
        state.log.push(TokenRequest {
            audience: audience.to_string(),
            timestamp: Utc::now(),
        });

        let token = state
            .tokens
            .get(&audience.to_lowercase())
            .cloned()
            .or_else(|| state.default_token.clone())
            .unwrap_or_else(|| FALLBACK_TOKEN.to_string());

        Ok(token)
    }
}
