//! HTTP transport boundary.
//!
//! The pipeline never talks to the network directly; it goes through the
//! [`HttpTransport`] trait so tests and alternative stacks can substitute
//! their own implementation. [`ReqwestTransport`] is the default.

use async_trait::async_trait;

use crate::api::{ApiRequest, ApiResponse};
use crate::error::TransportError;

/// A transport capable of performing one HTTP exchange.
///
/// The contract mirrors the requester's needs: send the fully-formed
/// request, return the response on success, and surface any non-success
/// status as [`TransportError::Status`] carrying the attached response.
/// Failures without a response (connection refused, DNS, timeout) use the
/// other [`TransportError`] variants. Retry, timeout, and pooling policy
/// belong to the transport, not to this crate.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs one exchange.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// The default transport, backed by [`reqwest`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a new transport with a default reqwest client.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Create a transport around an existing reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone());

        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.text().await?;

        let response = ApiResponse::new(status.as_u16(), headers, body);
        if status.is_success() {
            Ok(response)
        } else {
            Err(TransportError::Status { response })
        }
    }
}
