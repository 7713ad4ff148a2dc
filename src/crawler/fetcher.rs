//! Fetcher: one network fetch plus link extraction per call
//!
//! Every call takes one permit from the admission gate before touching the
//! network, which bounds the number of simultaneous requests no matter how
//! many crawl tasks are alive. The permit is a RAII guard, so it is returned
//! on every exit path.

use crate::crawler::parser::extract_hrefs;
use crate::crawler::transport::{is_html, Transport, TransportResponse};
use crate::{ConfigError, FetchError};
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Fetches pages and extracts their outbound hrefs
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    gate: Semaphore,
    capacity: usize,
}

impl Fetcher {
    /// Creates a fetcher allowing at most `max_concurrent` requests in flight
    ///
    /// # Errors
    ///
    /// * `ConfigError::Validation` - `max_concurrent` is zero, which would
    ///   block every fetch forever, or exceeds `Semaphore::MAX_PERMITS`
    pub fn new(
        transport: Arc<dyn Transport>,
        max_concurrent: usize,
    ) -> Result<Self, ConfigError> {
        if max_concurrent == 0 {
            return Err(ConfigError::Validation(
                "fetch concurrency limit must be at least 1".to_string(),
            ));
        }
        if max_concurrent > Semaphore::MAX_PERMITS {
            return Err(ConfigError::Validation(format!(
                "fetch concurrency limit must be at most {}, got {}",
                Semaphore::MAX_PERMITS,
                max_concurrent
            )));
        }

        Ok(Self {
            transport,
            gate: Semaphore::new(max_concurrent),
            capacity: max_concurrent,
        })
    }

    /// Fetches `url` and returns the raw hrefs of its anchors
    ///
    /// # Request Flow
    ///
    /// 1. Wait for an admission permit
    /// 2. Perform exactly one transport GET
    /// 3. Release the permit
    /// 4. Classify the response
    ///
    /// # Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Transport failure | `FetchError::Transport` |
    /// | HTTP 404 | `FetchError::NotFound` |
    /// | Content-Type not `text/html*` | `FetchError::UnsupportedContentType` |
    /// | Otherwise | hrefs in document order |
    pub async fn fetch_links(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let response = {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|_| FetchError::GateClosed)?;

            tracing::trace!("Fetching {}", url);
            self.transport
                .get(url)
                .await
                .map_err(|source| FetchError::Transport {
                    url: url.to_string(),
                    source,
                })?
        };

        classify_response(url, response)
    }

    /// Number of fetches currently holding a permit
    pub fn in_flight(&self) -> usize {
        self.capacity - self.gate.available_permits()
    }

    /// Configured admission gate capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Maps a transport response to extracted hrefs or a classified error
pub fn classify_response(
    url: &str,
    response: TransportResponse,
) -> Result<Vec<String>, FetchError> {
    if response.status == StatusCode::NOT_FOUND.as_u16() {
        return Err(FetchError::NotFound {
            url: url.to_string(),
        });
    }

    if !is_html(response.content_type.as_deref()) {
        return Err(FetchError::UnsupportedContentType {
            url: url.to_string(),
            content_type: response.content_type,
        });
    }

    Ok(extract_hrefs(&response.body))
}
