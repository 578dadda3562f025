//! Outbound HTTP seam for the airport and distance providers
//!
//! Components talk to the network only through [`Transport`], so the
//! directory fetcher and distance resolver can run against canned payloads.
//! [`HttpTransport`] is the production implementation on top of `reqwest`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use flight_compensation::{HttpTransport, Transport};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let http = HttpTransport::builder()
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     let body = http.get("https://airportgap.com/api/airports").await?;
//!     println!("{} bytes", body.len());
//!     Ok(())
//! }
//! ```

use bytes::Bytes;
use reqwest::{Client, RequestBuilder, StatusCode, header};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::airport::config::AirportConfig;
use crate::airport::error::{AirportError, AirportResult};

/// Minimal HTTP surface the engine needs from its upstream providers.
pub trait Transport: Send + Sync + 'static {
    /// GET `url` and return the raw body of a successful response.
    fn get(&self, url: &str) -> impl Future<Output = AirportResult<Bytes>> + Send;

    /// POST `body` as JSON to `url` and return the raw response body.
    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> impl Future<Output = AirportResult<Bytes>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    async fn get(&self, url: &str) -> AirportResult<Bytes> {
        (**self).get(url).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> AirportResult<Bytes> {
        (**self).post_json(url, body).await
    }
}

/// `reqwest`-backed transport.
///
/// Cloning is cheap (the inner client is reference counted).
#[derive(Clone, Debug)]
pub struct HttpTransport {
    inner: Client,
    token: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new transport builder
    #[must_use]
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    /// Build a transport from the engine configuration.
    pub fn from_config(config: &AirportConfig) -> AirportResult<Self> {
        let mut builder = Self::builder().timeout(config.http_timeout);
        if let Some(token) = &config.api_token {
            builder = builder.bearer_token(token.clone());
        }
        builder.build()
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> AirportResult<Bytes> {
        let response = self
            .authorize(request)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(AirportError::RateLimited { retry_after });
        }
        if !status.is_success() {
            return Err(AirportError::UpstreamUnavailable(format!(
                "{operation}: HTTP {status}"
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| self.transport_error(operation, e))
    }

    fn transport_error(&self, operation: &str, e: reqwest::Error) -> AirportError {
        if e.is_timeout() {
            AirportError::Timeout {
                operation: operation.to_string(),
                duration: self.timeout,
            }
        } else {
            AirportError::from(e)
        }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> AirportResult<Bytes> {
        self.send(&format!("GET {url}"), self.inner.get(url)).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> AirportResult<Bytes> {
        self.send(&format!("POST {url}"), self.inner.post(url).json(body))
            .await
    }
}

/// Builder for creating `HttpTransport`
pub struct HttpTransportBuilder {
    token: Option<String>,
    timeout: Duration,
    user_agent: String,
}

impl HttpTransportBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: None,
            timeout: Duration::from_secs(10),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the `HttpTransport`
    pub fn build(self) -> AirportResult<HttpTransport> {
        let inner = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .map_err(|e| AirportError::ClientSetup(e.to_string()))?;

        Ok(HttpTransport {
            inner,
            token: self.token,
            timeout: self.timeout,
        })
    }
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
