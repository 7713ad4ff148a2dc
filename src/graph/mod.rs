//! Thread-safe link graph
//!
//! The graph is the crawl's single deduplication authority: a page is fetched
//! only by the task whose `add_node` call inserted it. Edges may name targets
//! that have not been registered yet; once the crawl has joined, every target
//! that was itself crawled is also a node.

mod export;

pub use export::GraphExport;

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct GraphInner {
    nodes: HashSet<String>,
    edges: HashMap<String, HashSet<String>>,
    edge_count: usize,
}

/// Registry of discovered URLs and the links between them
#[derive(Debug, Default)]
pub struct LinkGraph {
    inner: Mutex<GraphInner>,
}

impl LinkGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation leaves the maps consistent, so a panic elsewhere while
    // holding the lock does not invalidate the data.
    fn lock(&self) -> MutexGuard<'_, GraphInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a node
    ///
    /// Returns `true` if the URL was newly inserted and `false` if it was
    /// already present. The check and the insert happen under one lock, so
    /// among any number of concurrent callers exactly one sees `true`.
    pub fn add_node(&self, url: &str) -> bool {
        let mut inner = self.lock();
        if inner.nodes.contains(url) {
            return false;
        }
        inner.nodes.insert(url.to_string())
    }

    /// Records that `source` links to `target`
    ///
    /// Idempotent; returns `true` only when the edge is new. Neither endpoint
    /// has to be a node yet.
    pub fn add_edge(&self, source: &str, target: &str) -> bool {
        let mut inner = self.lock();
        let inserted = match inner.edges.get_mut(source) {
            Some(targets) => {
                if targets.contains(target) {
                    false
                } else {
                    targets.insert(target.to_string())
                }
            }
            None => {
                let mut targets = HashSet::new();
                targets.insert(target.to_string());
                inner.edges.insert(source.to_string(), targets);
                true
            }
        };
        if inserted {
            inner.edge_count += 1;
        }
        inserted
    }

    /// Returns true if `url` is a registered node
    pub fn contains(&self, url: &str) -> bool {
        self.lock().nodes.contains(url)
    }

    /// Returns true if the edge `source -> target` has been recorded
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.lock()
            .edges
            .get(source)
            .map_or(false, |targets| targets.contains(target))
    }

    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.lock().edge_count
    }

    /// Snapshot of the node set plus each node's outgoing edges, sorted
    pub fn export_graph(&self) -> GraphExport {
        let inner = self.lock();
        GraphExport::from_parts(&inner.nodes, &inner.edges)
    }

    /// Renders the node set as a sitemaps.org `urlset` document
    pub fn export_sitemap(&self) -> String {
        let mut urls: Vec<String> = self.lock().nodes.iter().cloned().collect();
        urls.sort();
        crate::output::render_sitemap(urls.iter().map(String::as_str))
    }
}
