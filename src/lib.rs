//! Sitemapper: a concurrent, depth-bounded site crawler
//!
//! This crate crawls a web domain starting from a seed URL, records every
//! discovered page and the links between them in a thread-safe graph, and
//! exports that graph as JSON or as a sitemaps.org document.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for sitemapper operations
#[derive(Debug, Error)]
pub enum SitemapperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Errors raised by the injected transport
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),
}

/// Classified outcome of a failed fetch
///
/// None of these abort a crawl; the affected page simply contributes no links.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("URL gives 404: {url}")]
    NotFound { url: String },

    #[error("Unsupported content type {content_type:?} for {url}")]
    UnsupportedContentType {
        url: String,
        content_type: Option<String>,
    },

    #[error("Admission gate closed")]
    GateClosed,
}

impl FetchError {
    /// Short label used for statistics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::NotFound { .. } => "not_found",
            Self::UnsupportedContentType { .. } => "unsupported_content_type",
            Self::GateClosed => "gate_closed",
        }
    }
}

/// Result type alias for sitemapper operations
pub type Result<T> = std::result::Result<T, SitemapperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOptions, Crawler, Fetcher, HttpTransport, Transport, TransportResponse};
pub use graph::{GraphExport, LinkGraph};
pub use crate::url::{canonicalize, parse_seed, resolve_link, CanonicalUrl, ScopePolicy};
