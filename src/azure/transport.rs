//! HTTP transport used by the Azure DevOps client
//!
//! The client only needs a GET that hands back a status code and a body; pooling,
//! TLS and timeouts belong to the transport.

use crate::error::RemoteError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Raw HTTP response as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing HTTP GET requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform a GET. Non-2xx statuses are returned as responses, not errors;
    /// only transport failures (DNS, TLS, timeouts) are `Err`.
    async fn get(&self, url: &Url, headers: &[(&str, String)]) -> Result<HttpResponse, RemoteError>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl ReqwestTransport {
    /// Create a transport with a request timeout and user agent
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| RemoteError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Wrap an existing client (timeout is used only for error reporting)
    pub fn with_client(client: reqwest::Client, timeout_secs: u64) -> Self {
        Self {
            client,
            timeout_secs,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url, headers: &[(&str, String)]) -> Result<HttpResponse, RemoteError> {
        let mut request = self.client.get(url.clone());
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout(self.timeout_secs)
            } else {
                RemoteError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::Timeout(self.timeout_secs)
            } else {
                RemoteError::Transport(format!("Failed to read response body: {}", e))
            }
        })?;

        Ok(HttpResponse { status, body })
    }
}
