//! HTTP generation client

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::types::GenerationResponse;
use crate::domain::errors::GenerationError;
use crate::domain::models::{ApiConfig, Batch, EndpointConfig};
use crate::domain::ports::{GenerationClient, GenerationRequest, TokenProvider};

/// Configuration for one generation endpoint client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// API base URL, without trailing slash
    pub base_url: String,

    /// Endpoint path, e.g. `/api/leads/generate`
    pub path: String,

    /// Per-call timeout, independent of any session budget
    pub call_timeout: Duration,
}

impl HttpClientConfig {
    /// Settings for one endpoint of the configured API
    pub fn new(api: &ApiConfig, endpoint: &EndpointConfig) -> Self {
        Self {
            base_url: api.base_url.trim_end_matches('/').to_string(),
            path: endpoint.path.clone(),
            call_timeout: Duration::from_secs(api.call_timeout_secs),
        }
    }

    /// Full endpoint URL
    pub fn url(&self) -> String {
        if self.path.starts_with('/') {
            format!("{}{}", self.base_url, self.path)
        } else {
            format!("{}/{}", self.base_url, self.path)
        }
    }
}

/// reqwest-backed [`GenerationClient`].
///
/// Posts the request body as JSON with a bearer token read from the
/// [`TokenProvider`] on every call. Makes exactly one HTTP request per
/// invocation and never retries.
pub struct HttpGenerationClient<R> {
    http_client: ReqwestClient,
    config: HttpClientConfig,
    tokens: Arc<dyn TokenProvider>,
    _record: PhantomData<fn() -> R>,
}

impl<R> HttpGenerationClient<R> {
    /// Build the client; fails only if reqwest cannot initialize TLS
    pub fn new(config: HttpClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            config,
            tokens,
            _record: PhantomData,
        })
    }

    /// Endpoint settings
    pub const fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

impl<R> HttpGenerationClient<R>
where
    R: DeserializeOwned,
{
    async fn send(&self, token: &str, request: &GenerationRequest) -> Result<Batch<R>, GenerationError> {
        let response = self
            .http_client
            .post(self.config.url())
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(GenerationError::from_status(status, body));
        }

        let bytes = response.bytes().await?;
        let parsed: GenerationResponse<R> = serde_json::from_slice(&bytes)?;

        if !parsed.success {
            return Err(GenerationError::Rejected(
                parsed
                    .message
                    .unwrap_or_else(|| "generation unsuccessful".to_string()),
            ));
        }
        Ok(Batch::new(parsed.contacts))
    }
}

#[async_trait]
impl<R> GenerationClient<R> for HttpGenerationClient<R>
where
    R: DeserializeOwned + Send + 'static,
{
    #[instrument(skip(self, request, cancel), fields(attempt = request.attempt_index, path = %self.config.path))]
    async fn generate(
        &self,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<Batch<R>, GenerationError> {
        let token = self.tokens.token().ok_or(GenerationError::MissingToken)?;

        let call = tokio::time::timeout(self.config.call_timeout, self.send(&token, &request));
        let result = select! {
            outcome = call => {
                outcome.unwrap_or(Err(GenerationError::Timeout(self.config.call_timeout)))
            }
            () = cancel.cancelled() => Err(GenerationError::Cancelled),
        };

        match &result {
            Ok(batch) => debug!(records = batch.len(), "generation call succeeded"),
            Err(error) => warn!(error = %error, "generation call failed"),
        }
        result
    }
}
