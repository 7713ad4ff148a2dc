//! Crawler module for web page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - The injected HTTP transport
//! - Bounded-concurrency fetching and link extraction
//! - Recursive, depth-bounded crawl coordination
//! - Crawl event observers

mod coordinator;
mod fetcher;
mod observer;
mod parser;
mod transport;

pub use coordinator::{run_crawl, CrawlOptions, CrawlReport, Crawler};
pub use fetcher::{classify_response, Fetcher};
pub use observer::{CrawlObserver, CrawlStats, ObserverSet, TracingObserver};
pub use parser::extract_hrefs;
pub use transport::{
    build_http_client, HttpTransport, Transport, TransportResponse, MAX_BODY_BYTES,
};

use crate::config::Config;
use crate::SitemapperError;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. The configuration is
/// validated again here so that library callers get the same pre-flight
/// guarantees as the command line.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `cancel` - Token that stops the crawl early, keeping partial results
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The discovered graph and crawl statistics
/// * `Err(SitemapperError)` - Invalid configuration or HTTP client setup
pub async fn crawl(
    config: &Config,
    cancel: CancellationToken,
) -> Result<CrawlReport, SitemapperError> {
    crate::config::validate(config)?;
    run_crawl(config, cancel).await
}
