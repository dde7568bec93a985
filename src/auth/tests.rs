//! Tests for the auth module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Authentication options
// ============================================================================

#[test]
fn api_key_uses_default_header() {
    let auth = AuthenticationOptions::api_key("k1").unwrap();
    assert_eq!(
        auth,
        AuthenticationOptions::ApiKey {
            api_key: "k1".to_string(),
            header_name: DEFAULT_API_KEY_HEADER.to_string(),
        }
    );
}

#[test]
fn api_key_custom_header() {
    let auth = AuthenticationOptions::api_key_with_header("k1", "X-Service-Key").unwrap();
    assert!(matches!(
        auth,
        AuthenticationOptions::ApiKey { ref header_name, .. } if header_name == "X-Service-Key"
    ));
}

#[test]
fn empty_api_key_is_rejected() {
    // An empty key is a caller bug, not "no auth"
    assert!(AuthenticationOptions::api_key("").is_err());
    assert!(AuthenticationOptions::api_key("   ").is_err());

    let err = AuthenticationOptions::api_key("").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { name, .. } if name == "api_key"));
}

#[test]
fn empty_header_name_is_rejected() {
    assert!(AuthenticationOptions::api_key_with_header("k1", "").is_err());
}

#[test]
fn empty_audience_is_rejected() {
    assert!(AuthenticationOptions::token_audience("").is_err());

    let auth = AuthenticationOptions::token_audience("catalog").unwrap();
    assert_eq!(
        auth,
        AuthenticationOptions::TokenAudience {
            audience: "catalog".to_string()
        }
    );
}

#[test]
fn default_is_none() {
    assert!(AuthenticationOptions::default().is_none());
}

// ============================================================================
// Cached token
// ============================================================================

#[test]
fn cached_token_not_expired() {
    let token = CachedToken::expires_in("test".to_string(), 3600);
    assert!(!token.is_expired());
}

#[test]
fn cached_token_expired() {
    let token = CachedToken::expires_in("test".to_string(), -100);
    assert!(token.is_expired());
}

#[test]
fn cached_token_without_expiration_never_expires() {
    let token = CachedToken::new("test".to_string(), None);
    assert!(!token.is_expired());
}

// ============================================================================
// Fake token provider
// ============================================================================

#[tokio::test]
async fn fake_provider_resolution_order() {
    let provider = FakeTokenProvider::new();
    provider.register_token("catalog", "token-catalog").unwrap();
    provider.set_default_token("token-default").unwrap();

    // Exact match beats default
    let token = provider.get_access_token("catalog").await.unwrap();
    assert_eq!(token, "token-catalog");

    // Audience match is case-insensitive
    let token = provider.get_access_token("CATALOG").await.unwrap();
    assert_eq!(token, "token-catalog");

    // Default beats fallback
    let token = provider.get_access_token("billing").await.unwrap();
    assert_eq!(token, "token-default");
}

#[tokio::test]
async fn fake_provider_falls_back_to_fixed_token() {
    let provider = FakeTokenProvider::new();
    let token = provider.get_access_token("anything").await.unwrap();
    assert_eq!(token, FALLBACK_TOKEN);
}

#[tokio::test]
async fn fake_provider_logs_every_resolution() {
    let provider = FakeTokenProvider::new();
    provider.register_token("catalog", "t").unwrap();

    provider.get_access_token("catalog").await.unwrap();
    provider.get_access_token("billing").await.unwrap();
    provider.get_access_token("Catalog").await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].audience, "catalog");
    assert_eq!(requests[1].audience, "billing");

    // Per-audience count is case-insensitive and grows by exactly one per call
    assert_eq!(provider.request_count("catalog"), 2);
    assert_eq!(provider.request_count("billing"), 1);
    assert_eq!(provider.request_count("unseen"), 0);
}

#[tokio::test]
async fn fake_provider_clear_empties_mapping_and_log() {
    let provider = FakeTokenProvider::new();
    provider.register_token("catalog", "token-catalog").unwrap();
    provider.get_access_token("catalog").await.unwrap();

    provider.clear();

    assert!(provider.requests().is_empty());
    // The registration is gone, so resolution falls back to the generic token
    let token = provider.get_access_token("catalog").await.unwrap();
    assert_eq!(token, FALLBACK_TOKEN);
}

#[test]
fn fake_provider_rejects_empty_registrations() {
    let provider = FakeTokenProvider::new();
    assert!(provider.register_token("", "token").is_err());
    assert!(provider.register_token("catalog", "").is_err());
    assert!(provider.set_default_token("  ").is_err());
}

// ============================================================================
// Client credentials provider
// ============================================================================

#[test]
fn client_credentials_provider_rejects_empty_config() {
    assert!(ClientCredentialsTokenProvider::new("", "id", "secret").is_err());
    assert!(ClientCredentialsTokenProvider::new("https://login.example.com", "", "secret").is_err());
    assert!(ClientCredentialsTokenProvider::new("https://login.example.com", "id", "").is_err());
}

#[tokio::test]
async fn client_credentials_provider_exchanges_and_caches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("scope=catalog%2F.default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-123",
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = ClientCredentialsTokenProvider::new(
        format!("{}/oauth/token", mock_server.uri()),
        "client-id",
        "client-secret",
    )
    .unwrap();

    let token = provider.get_access_token("catalog").await.unwrap();
    assert_eq!(token, "token-123");

    // Second resolution is served from the cache (mock expects exactly 1 hit)
    let token = provider.get_access_token("catalog").await.unwrap();
    assert_eq!(token, "token-123");
}

#[tokio::test]
async fn client_credentials_provider_refetches_after_clear() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-456",
            "expires_in": 3600
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let provider = ClientCredentialsTokenProvider::new(
        format!("{}/oauth/token", mock_server.uri()),
        "client-id",
        "client-secret",
    )
    .unwrap();

    provider.get_access_token("catalog").await.unwrap();
    provider.clear_cache().await;
    provider.get_access_token("catalog").await.unwrap();
}

#[tokio::test]
async fn client_credentials_provider_surfaces_endpoint_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&mock_server)
        .await;

    let provider = ClientCredentialsTokenProvider::new(
        format!("{}/oauth/token", mock_server.uri()),
        "client-id",
        "wrong-secret",
    )
    .unwrap();

    let err = provider.get_access_token("catalog").await.unwrap_err();
    assert!(matches!(err, Error::TokenExchange { .. }));
    assert!(err.to_string().contains("401"));
}
