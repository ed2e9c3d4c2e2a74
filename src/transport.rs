//! Single-shot upstream GET with a bounded timeout.
//!
//! The [`Transport`] trait is the seam between lookup logic and the network.
//! [`HttpTransport`] is the reqwest-backed implementation; tests substitute
//! their own. No retries and no backoff happen here: every call is one
//! request, and every failure is reported to the caller as data.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// Successful transport result: the status line and the raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Transport-level failure: timeout, DNS, connection, or a non-2xx response
/// without a body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,
    pub message: String,
}

/// Issues one GET against a fully-formed URL.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("steamlookup/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        classify_response(status, body)
    }
}

/// Non-2xx responses are only failures when there is nothing to inspect.
fn classify_response(status: u16, body: String) -> Result<HttpResponse, TransportError> {
    if !(200..300).contains(&status) && body.trim().is_empty() {
        return Err(TransportError {
            status: Some(status),
            message: format!("Request failed with status code {status}"),
        });
    }
    Ok(HttpResponse { status, body })
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    };
    TransportError {
        status: error.status().map(|s| s.as_u16()),
        message,
    }
}
