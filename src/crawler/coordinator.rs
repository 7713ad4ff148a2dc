//! Crawl coordinator - recursive, depth-bounded traversal
//!
//! Each crawled URL is handled by its own tokio task. A task registers its
//! URL in the graph, fetches the page, records an edge for every qualifying
//! link and hands the links back as child tasks. The driver loop owns a
//! single `JoinSet`, spawns children into it as parents finish, and returns
//! once the set is empty: that is the full transitive closure of the crawl.
//!
//! Termination: node registration is atomic and permanent, so no URL is
//! expanded twice, and depth drops by one on every edge followed.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::observer::{CrawlObserver, CrawlStats, ObserverSet, TracingObserver};
use crate::crawler::transport::HttpTransport;
use crate::graph::LinkGraph;
use crate::output::CrawlStatistics;
use crate::url::{parse_seed, resolve_link, CanonicalUrl, ScopePolicy};
use crate::SitemapperError;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Per-crawl traversal settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Remaining depth at the seed; `<= 0` records the seed without fetching
    pub depth: i64,
    /// Only follow links that the scope policy accepts
    pub root_only: bool,
    /// Scope policy applied when `root_only` is set
    pub scope: ScopePolicy,
}

impl CrawlOptions {
    pub fn new(depth: i64, root_only: bool) -> Self {
        Self {
            depth,
            root_only,
            scope: ScopePolicy::default(),
        }
    }

    pub fn with_scope(mut self, scope: ScopePolicy) -> Self {
        self.scope = scope;
        self
    }
}

impl From<&CrawlerConfig> for CrawlOptions {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            depth: config.max_depth,
            root_only: config.root_only,
            scope: config.scope,
        }
    }
}

/// One unit of crawl work
#[derive(Debug, Clone)]
struct CrawlTask {
    url: CanonicalUrl,
    depth: i64,
    root_only: bool,
}

/// State shared by every task of one crawl
struct CrawlContext {
    seed: CanonicalUrl,
    scope: ScopePolicy,
    graph: Arc<LinkGraph>,
    fetcher: Arc<Fetcher>,
    observer: Arc<dyn CrawlObserver>,
    cancel: CancellationToken,
}

/// Crawl orchestrator
#[derive(Clone)]
pub struct Crawler {
    fetcher: Arc<Fetcher>,
    observer: Arc<dyn CrawlObserver>,
}

impl Crawler {
    /// Creates a crawler that fetches through `fetcher` and reports to `observer`
    pub fn new(fetcher: Fetcher, observer: Arc<dyn CrawlObserver>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            observer,
        }
    }

    /// Crawls from `seed` and returns the graph once every task has finished
    pub async fn start(&self, seed: &CanonicalUrl, options: CrawlOptions) -> Arc<LinkGraph> {
        self.start_with_cancellation(seed, options, CancellationToken::new())
            .await
    }

    /// Like [`Crawler::start`], stopping early when `cancel` fires
    ///
    /// After cancellation no new task is spawned and in-flight fetches are
    /// abandoned. Nodes and edges recorded so far are kept, so the returned
    /// graph is a valid partial result.
    pub async fn start_with_cancellation(
        &self,
        seed: &CanonicalUrl,
        options: CrawlOptions,
        cancel: CancellationToken,
    ) -> Arc<LinkGraph> {
        let context = Arc::new(CrawlContext {
            seed: seed.clone(),
            scope: options.scope,
            graph: Arc::new(LinkGraph::new()),
            fetcher: Arc::clone(&self.fetcher),
            observer: Arc::clone(&self.observer),
            cancel,
        });

        tracing::info!(
            depth = options.depth,
            root_only = options.root_only,
            scope = ?options.scope,
            "Starting crawl at {}",
            seed
        );

        let mut tasks = JoinSet::new();
        tasks.spawn(run_task(
            Arc::clone(&context),
            CrawlTask {
                url: seed.clone(),
                depth: options.depth,
                root_only: options.root_only,
            },
        ));

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(children) => {
                    if context.cancel.is_cancelled() {
                        continue;
                    }
                    for child in children {
                        tasks.spawn(run_task(Arc::clone(&context), child));
                    }
                }
                Err(e) if e.is_panic() => {
                    tracing::error!("Crawl task panicked: {}", e);
                }
                Err(e) => {
                    tracing::debug!("Crawl task did not complete: {}", e);
                }
            }
        }

        if context.cancel.is_cancelled() {
            context.observer.on_cancelled();
        }

        tracing::info!(
            "Crawl finished: {} pages, {} links",
            context.graph.node_count(),
            context.graph.edge_count()
        );

        Arc::clone(&context.graph)
    }
}

/// Processes one task and returns the child tasks to spawn
async fn run_task(context: Arc<CrawlContext>, task: CrawlTask) -> Vec<CrawlTask> {
    let observer = &context.observer;

    if !context.graph.add_node(task.url.as_str()) {
        observer.on_duplicate(&task.url);
        return Vec::new();
    }
    observer.on_node_registered(&task.url, task.depth);

    if task.depth <= 0 || context.cancel.is_cancelled() {
        return Vec::new();
    }

    let fetched = tokio::select! {
        biased;
        _ = context.cancel.cancelled() => None,
        result = context.fetcher.fetch_links(task.url.as_str()) => Some(result),
    };

    let hrefs = match fetched {
        Some(Ok(hrefs)) => {
            observer.on_fetch_succeeded(&task.url, hrefs.len());
            hrefs
        }
        Some(Err(e)) => {
            observer.on_fetch_failed(&task.url, &e);
            return Vec::new();
        }
        None => {
            tracing::debug!("Fetch of {} abandoned on cancellation", task.url);
            return Vec::new();
        }
    };

    let mut children = Vec::new();
    for href in &hrefs {
        let link = match resolve_link(&task.url, href) {
            Ok(link) => link,
            Err(e) => {
                observer.on_link_malformed(&task.url, href, &e);
                continue;
            }
        };

        if task.root_only && !context.scope.allows(&context.seed, &link) {
            observer.on_link_out_of_scope(&task.url, &link);
            continue;
        }

        // An edge that already exists means this page listed the link
        // earlier and its child task is already queued
        if !context.graph.add_edge(task.url.as_str(), link.as_str()) {
            continue;
        }
        observer.on_edge(&task.url, &link);

        children.push(CrawlTask {
            url: link,
            depth: task.depth - 1,
            root_only: task.root_only,
        });
    }

    children
}

/// Outcome of a configured crawl
pub struct CrawlReport {
    pub graph: Arc<LinkGraph>,
    pub statistics: CrawlStatistics,
}

/// Runs a complete crawl from a validated configuration
///
/// This function:
///
/// 1. Parses the seed URL
/// 2. Builds the HTTP transport and the fetcher's admission gate
/// 3. Wires the tracing and statistics observers
/// 4. Crawls until done or until `cancel` fires
///
/// # Example
///
/// ```no_run
/// use sitemapper::config::Config;
/// use sitemapper::crawler::run_crawl;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::for_seed("example.com");
/// let report = run_crawl(&config, CancellationToken::new()).await?;
/// println!("{} pages", report.graph.node_count());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    cancel: CancellationToken,
) -> Result<CrawlReport, SitemapperError> {
    let crawler_config = &config.crawler;
    let seed = parse_seed(&crawler_config.seed, &crawler_config.default_scheme)?;

    let transport = Arc::new(HttpTransport::new()?);
    let fetcher = Fetcher::new(transport, crawler_config.max_concurrent_fetches)?;

    let stats = Arc::new(CrawlStats::new());
    let observer = ObserverSet::new()
        .with(Arc::new(TracingObserver::new(crawler_config.debug)))
        .with(stats.clone());

    let crawler = Crawler::new(fetcher, Arc::new(observer));
    let graph = crawler
        .start_with_cancellation(&seed, CrawlOptions::from(crawler_config), cancel)
        .await;

    let statistics = stats.snapshot(&graph);
    Ok(CrawlReport { graph, statistics })
}
