//! Crawl observability
//!
//! The coordinator reports what happens during a crawl to a [`CrawlObserver`]
//! handed to it at construction. Every method has an empty default so an
//! observer implements only the events it cares about.

use crate::graph::LinkGraph;
use crate::output::CrawlStatistics;
use crate::url::CanonicalUrl;
use crate::{FetchError, UrlError};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Receiver of crawl events
///
/// Called concurrently from many tasks; implementations must be cheap and
/// must not block.
pub trait CrawlObserver: Send + Sync {
    /// A task registered a new node
    fn on_node_registered(&self, _url: &CanonicalUrl, _depth: i64) {}

    /// A task found its URL already registered and stopped
    fn on_duplicate(&self, _url: &CanonicalUrl) {}

    /// A fetch returned HTML with `link_count` hrefs
    fn on_fetch_succeeded(&self, _url: &CanonicalUrl, _link_count: usize) {}

    /// A fetch failed; the page contributes no links
    fn on_fetch_failed(&self, _url: &CanonicalUrl, _error: &FetchError) {}

    /// An href could not be turned into a canonical URL
    fn on_link_malformed(&self, _source: &CanonicalUrl, _href: &str, _error: &UrlError) {}

    /// A link was dropped by the scope policy
    fn on_link_out_of_scope(&self, _source: &CanonicalUrl, _link: &CanonicalUrl) {}

    /// A new edge was recorded
    fn on_edge(&self, _source: &CanonicalUrl, _target: &CanonicalUrl) {}

    /// The crawl stopped early because it was cancelled
    fn on_cancelled(&self) {}
}

/// Observer that logs events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver {
    debug: bool,
}

impl TracingObserver {
    /// With `debug` set, failed fetches are logged at warn instead of debug
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl CrawlObserver for TracingObserver {
    fn on_node_registered(&self, url: &CanonicalUrl, depth: i64) {
        tracing::debug!(depth, "Discovered {}", url);
    }

    fn on_duplicate(&self, url: &CanonicalUrl) {
        tracing::trace!("Already registered: {}", url);
    }

    fn on_fetch_succeeded(&self, url: &CanonicalUrl, link_count: usize) {
        tracing::debug!(links = link_count, "Fetched {}", url);
    }

    fn on_fetch_failed(&self, url: &CanonicalUrl, error: &FetchError) {
        if self.debug {
            tracing::warn!(
                kind = error.kind(),
                "Crawler encountered an error while crawling {}: {}",
                url,
                error
            );
        } else {
            tracing::debug!(kind = error.kind(), "Fetch failed for {}: {}", url, error);
        }
    }

    fn on_link_malformed(&self, source: &CanonicalUrl, href: &str, error: &UrlError) {
        tracing::debug!("Skipping link {:?} on {}: {}", href, source, error);
    }

    fn on_link_out_of_scope(&self, source: &CanonicalUrl, link: &CanonicalUrl) {
        tracing::trace!("Out of scope: {} (linked from {})", link, source);
    }

    fn on_cancelled(&self) {
        tracing::warn!("Crawl cancelled; keeping partial results");
    }
}

/// Observer that counts events for the end-of-crawl summary
#[derive(Debug)]
pub struct CrawlStats {
    started: Instant,
    pages_fetched: AtomicU64,
    links_extracted: AtomicU64,
    links_malformed: AtomicU64,
    links_out_of_scope: AtomicU64,
    cancelled: AtomicBool,
    errors: Mutex<BTreeMap<&'static str, u64>>,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            pages_fetched: AtomicU64::new(0),
            links_extracted: AtomicU64::new(0),
            links_malformed: AtomicU64::new(0),
            links_out_of_scope: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
            errors: Mutex::new(BTreeMap::new()),
        }
    }

    /// Time since this collector was created
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Combines the counters with the final graph sizes
    pub fn snapshot(&self, graph: &LinkGraph) -> CrawlStatistics {
        CrawlStatistics {
            total_pages: graph.node_count() as u64,
            total_links: graph.edge_count() as u64,
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            links_extracted: self.links_extracted.load(Ordering::Relaxed),
            links_malformed: self.links_malformed.load(Ordering::Relaxed),
            links_out_of_scope: self.links_out_of_scope.load(Ordering::Relaxed),
            error_summary: self
                .errors
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            elapsed: self.elapsed(),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }
}

impl CrawlObserver for CrawlStats {
    fn on_fetch_succeeded(&self, _url: &CanonicalUrl, link_count: usize) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
        self.links_extracted
            .fetch_add(link_count as u64, Ordering::Relaxed);
    }

    fn on_fetch_failed(&self, _url: &CanonicalUrl, error: &FetchError) {
        let mut errors = self.errors.lock().unwrap_or_else(PoisonError::into_inner);
        *errors.entry(error.kind()).or_insert(0) += 1;
    }

    fn on_link_malformed(&self, _source: &CanonicalUrl, _href: &str, _error: &UrlError) {
        self.links_malformed.fetch_add(1, Ordering::Relaxed);
    }

    fn on_link_out_of_scope(&self, _source: &CanonicalUrl, _link: &CanonicalUrl) {
        self.links_out_of_scope.fetch_add(1, Ordering::Relaxed);
    }

    fn on_cancelled(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Forwards every event to each observer in turn
#[derive(Default, Clone)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn CrawlObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl CrawlObserver for ObserverSet {
    fn on_node_registered(&self, url: &CanonicalUrl, depth: i64) {
        for o in &self.observers {
            o.on_node_registered(url, depth);
        }
    }

    fn on_duplicate(&self, url: &CanonicalUrl) {
        for o in &self.observers {
            o.on_duplicate(url);
        }
    }

    fn on_fetch_succeeded(&self, url: &CanonicalUrl, link_count: usize) {
        for o in &self.observers {
            o.on_fetch_succeeded(url, link_count);
        }
    }

    fn on_fetch_failed(&self, url: &CanonicalUrl, error: &FetchError) {
        for o in &self.observers {
            o.on_fetch_failed(url, error);
        }
    }

    fn on_link_malformed(&self, source: &CanonicalUrl, href: &str, error: &UrlError) {
        for o in &self.observers {
            o.on_link_malformed(source, href, error);
        }
    }

    fn on_link_out_of_scope(&self, source: &CanonicalUrl, link: &CanonicalUrl) {
        for o in &self.observers {
            o.on_link_out_of_scope(source, link);
        }
    }

    fn on_edge(&self, source: &CanonicalUrl, target: &CanonicalUrl) {
        for o in &self.observers {
            o.on_edge(source, target);
        }
    }

    fn on_cancelled(&self) {
        for o in &self.observers {
            o.on_cancelled();
        }
    }
}
