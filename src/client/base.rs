//! Base API client
//!
//! Turns a logical (resource path, method) pair into an executed HTTP round
//! trip and a typed envelope: build the request (attach auth), execute it
//! through the transport, map the raw response into `ApiResult<T>`.

use crate::auth::{AuthenticationOptions, TokenProvider};
use crate::error::{Error, Result};
use crate::options::ApiClientOptions;
use crate::response::ApiResult;
use crate::transport::{ApiRequest, RawResponse, RestTransport};
use crate::types::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Typed API client composing options, transport, and token resolution
///
/// The transport and token provider are capability interfaces; swapping in
/// the in-memory doubles changes nothing here.
#[derive(Clone)]
pub struct ApiClient {
    options: Arc<ApiClientOptions>,
    transport: Arc<dyn RestTransport>,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl ApiClient {
    /// Create a client from frozen options and a transport
    pub fn new(options: ApiClientOptions, transport: Arc<dyn RestTransport>) -> Result<Self> {
        if options.base_url.trim().is_empty() {
            return Err(Error::config("base_url must not be empty"));
        }
        Ok(Self {
            options: Arc::new(options),
            transport,
            token_provider: None,
        })
    }

    /// Attach a token provider for audience-scoped bearer authentication
    #[must_use]
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// The frozen client options
    pub fn options(&self) -> &ApiClientOptions {
        &self.options
    }

    /// The base URL requests are executed against
    pub fn base_url(&self) -> &str {
        &self.options.base_url
    }

    /// Build a request for a resource path, attaching the configured auth
    ///
    /// Fails with a configuration error if a token audience is configured
    /// but no token provider was supplied.
    pub async fn create_request(&self, resource_path: &str, method: Method) -> Result<ApiRequest> {
        let path = self.prefixed_path(resource_path);
        let mut request = ApiRequest::new(method, path)
            .retries(self.options.max_retry_count)
            .timeout(self.options.timeout);

        match &self.options.authentication {
            AuthenticationOptions::None => {}
            AuthenticationOptions::ApiKey {
                api_key,
                header_name,
            } => {
                debug!(header = %header_name, "attaching API key header");
                request = request.header(header_name.clone(), api_key.clone());
            }
            AuthenticationOptions::TokenAudience { audience } => {
                let provider =
                    self.token_provider
                        .as_ref()
                        .ok_or_else(|| Error::MissingTokenProvider {
                            audience: audience.clone(),
                        })?;
                let token = provider.get_access_token(audience).await?;
                debug!(audience = %audience, "attaching bearer token");
                request = request.header("Authorization", format!("Bearer {token}"));
            }
        }

        Ok(request)
    }

    /// Execute a prepared request through the transport
    ///
    /// HTTP error statuses come back as responses; only unrecoverable
    /// transport faults surface as errors.
    pub async fn execute(&self, request: &ApiRequest) -> Result<RawResponse> {
        self.transport
            .execute(&self.options.base_url, request)
            .await
    }

    /// Execute a prepared request and map the response into an envelope
    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<ApiResult<T>> {
        let raw = self.execute(request).await?;
        Ok(ApiResult::from_raw(&raw))
    }

    /// GET a resource
    pub async fn get<T: DeserializeOwned>(&self, resource_path: &str) -> Result<ApiResult<T>> {
        let request = self.create_request(resource_path, Method::GET).await?;
        self.send(&request).await
    }

    /// POST a JSON body to a resource
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        resource_path: &str,
        body: &B,
    ) -> Result<ApiResult<T>> {
        let mut request = self.create_request(resource_path, Method::POST).await?;
        request.body = Some(serde_json::to_value(body)?);
        self.send(&request).await
    }

    /// PUT a JSON body to a resource
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        resource_path: &str,
        body: &B,
    ) -> Result<ApiResult<T>> {
        let mut request = self.create_request(resource_path, Method::PUT).await?;
        request.body = Some(serde_json::to_value(body)?);
        self.send(&request).await
    }

    /// DELETE a resource
    pub async fn delete<T: DeserializeOwned>(&self, resource_path: &str) -> Result<ApiResult<T>> {
        let request = self.create_request(resource_path, Method::DELETE).await?;
        self.send(&request).await
    }

    /// Apply the configured path prefix to a resource path
    fn prefixed_path(&self, resource_path: &str) -> String {
        match &self.options.api_path_prefix {
            Some(prefix) => format!(
                "{}/{}",
                prefix.trim_matches('/'),
                resource_path.trim_start_matches('/')
            ),
            None => resource_path.to_string(),
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("options", &self.options)
            .field("has_token_provider", &self.token_provider.is_some())
            .finish_non_exhaustive()
    }
}
