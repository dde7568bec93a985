//! REST transport service
//!
//! Executes prepared requests against a base URL with bounded retry for
//! transient failures. The production transport lazily caches one
//! `reqwest::Client` per distinct base URL; the cache is the only shared
//! mutable state and is guarded by a single coarse lock.

use super::request::{ApiRequest, RawResponse};
use crate::error::{require_non_empty, Error, Result};
use crate::types::{BackoffType, StringMap};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Capability interface for executing a prepared request
///
/// Production and in-memory implementations are interchangeable; the base
/// client only ever talks to this trait.
#[async_trait]
pub trait RestTransport: Send + Sync {
    /// Execute a request against a base URL and return the raw response
    ///
    /// HTTP error statuses are returned as responses, never as errors.
    async fn execute(&self, base_url: &str, request: &ApiRequest) -> Result<RawResponse>;
}

/// Configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Default retry budget when a request carries none
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Default headers for all requests
    pub default_headers: StringMap,
    /// User agent string
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            default_headers: StringMap::new(),
            user_agent: format!("restkit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Create a new config builder
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::default()
    }
}

/// Builder for transport config
#[derive(Default)]
pub struct TransportConfigBuilder {
    config: TransportConfig,
}

impl TransportConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the default retry budget
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> TransportConfig {
        self.config
    }
}

/// Production transport backed by reqwest
///
/// One underlying client is created lazily per distinct base URL
/// (case-insensitive) and reused for every subsequent request to it.
pub struct HttpTransport {
    config: TransportConfig,
    clients: Mutex<HashMap<String, Client>>,
    closed: AtomicBool,
}

impl HttpTransport {
    /// Create a transport with default configuration
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Get the transport configuration
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Whether the transport has been shut down
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Shut down the transport, releasing all cached clients
    ///
    /// Any later execution fails with `Error::TransportClosed`.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.clients
            .lock()
            .expect("client cache lock poisoned")
            .clear();
    }

    /// Look up or lazily create the client for a base URL
    fn client_for(&self, base_url: &str) -> Result<Client> {
        if self.is_closed() {
            return Err(Error::TransportClosed);
        }
        require_non_empty("base_url", base_url)?;
        Url::parse(base_url)?;

        let key = base_url.trim_end_matches('/').to_lowercase();
        let mut clients = self.clients.lock().expect("client cache lock poisoned");
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        debug!(base_url = %key, "creating client for base URL");
        let client = Client::builder()
            .timeout(self.config.timeout)
            .user_agent(&self.config.user_agent)
            .build()?;
        clients.insert(key, client.clone());
        Ok(client)
    }

    /// Calculate backoff delay for a given attempt
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RestTransport for HttpTransport {
    async fn execute(&self, base_url: &str, request: &ApiRequest) -> Result<RawResponse> {
        let client = self.client_for(base_url)?;
        let url = join_url(base_url, &request.resource_path);
        let max_retries = request.max_retries.unwrap_or(self.config.max_retries);
        let timeout = request.timeout.unwrap_or(self.config.timeout);

        let mut last_error = None;
        let mut attempt = 0;

        while attempt <= max_retries {
            let mut req = client.request(request.method.into(), &url);

            for (key, value) in &self.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }
            for (key, value) in &request.headers {
                req = req.header(key.as_str(), value.as_str());
            }
            if !request.query.is_empty() {
                req = req.query(&request.query);
            }
            if let Some(ref body) = request.body {
                req = req.json(body);
            }
            req = req.timeout(timeout);

            match req.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if is_transient_status(status) && attempt < max_retries {
                        let delay = self.backoff_delay(attempt);
                        warn!(
                            status,
                            attempt = attempt + 1,
                            max_attempts = max_retries + 1,
                            delay_ms = delay.as_millis() as u64,
                            "transient status, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    // 4xx and exhausted 5xx are data, not faults
                    debug!(status, method = %request.method, url = %url, "request completed");
                    return RawResponse::from_reqwest(response).await;
                }
                Err(e) if e.is_timeout() => {
                    if attempt < max_retries {
                        let delay = self.backoff_delay(attempt);
                        warn!(
                            attempt = attempt + 1,
                            max_attempts = max_retries + 1,
                            delay_ms = delay.as_millis() as u64,
                            "request timeout, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(Error::Timeout {
                            timeout_ms: timeout.as_millis() as u64,
                        });
                        continue;
                    }
                    return Err(Error::Timeout {
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                Err(e) if e.is_connect() && attempt < max_retries => {
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = max_retries + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "connection error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    last_error = Some(Error::Http(e));
                    continue;
                }
                Err(e) => return Err(Error::Http(e)),
            }
        }

        Err(last_error.unwrap_or(Error::MaxRetriesExceeded { max_retries }))
    }
}

/// Join a base URL and a resource path with exactly one slash
fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Whether an HTTP status is a transient failure eligible for retry
///
/// Only server errors qualify; 4xx responses are returned as-is.
fn is_transient_status(status: u16) -> bool {
    (500..=599).contains(&status)
}
