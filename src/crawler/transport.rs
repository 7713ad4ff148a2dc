//! HTTP transport
//!
//! The fetcher talks to the network only through the [`Transport`] trait so
//! that crawls can run against in-memory sites in tests. [`HttpTransport`] is
//! the reqwest-backed implementation used by the binary.

use crate::TransportError;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// HTML bodies are cut off after this many bytes
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Response as seen by the fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, if present
    pub content_type: Option<String>,

    /// Response body
    pub body: String,
}

impl TransportResponse {
    /// Convenience constructor for a `200 text/html` response
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.into(),
        }
    }
}

/// Capability to perform one GET request
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

/// Builds the HTTP client used for crawling
///
/// Redirects are followed (up to 10 hops) and compressed bodies are decoded
/// transparently.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Transport`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the default crawling client
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client()?))
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let mut response = self.client.get(url).send().await.map_err(classify_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Only HTML bodies are ever parsed; anything else is left unread
        if !is_html(content_type.as_deref()) {
            return Ok(TransportResponse {
                status,
                content_type,
                body: String::new(),
            });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(classify_error)? {
            let room = MAX_BODY_BYTES - body.len();
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                tracing::debug!("Body of {} truncated at {} bytes", url, MAX_BODY_BYTES);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(TransportResponse {
            status,
            content_type,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

/// Returns true for a `text/html` Content-Type (parameters allowed)
pub(crate) fn is_html(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.starts_with("text/html"))
}

fn classify_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}
