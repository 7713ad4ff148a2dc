//! Integration tests for the crawler
//!
//! Scenario tests run against an in-memory transport so they can use real
//! host names; the end-to-end tests use wiremock to serve pages over HTTP.

use async_trait::async_trait;
use sitemapper::config::Config;
use sitemapper::crawler::{crawl, CrawlOptions, CrawlStats, Crawler, Fetcher, TracingObserver};
use sitemapper::url::{parse_seed, ScopePolicy};
use sitemapper::{Transport, TransportResponse};
use sitemapper::TransportError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory site keyed by canonical URL
///
/// Unknown URLs answer 404. Every request is recorded, and the number of
/// simultaneous requests is tracked so tests can check the admission gate.
#[derive(Default)]
struct MockSite {
    pages: HashMap<String, TransportResponse>,
    calls: Mutex<Vec<String>>,
    delay: Duration,
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl MockSite {
    fn new() -> Self {
        Self::default()
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn page(mut self, url: &str, links: &[&str]) -> Self {
        let body = links
            .iter()
            .map(|l| format!("<a href=\"{}\">link</a>\n", l))
            .collect::<String>();
        self.pages.insert(
            url.to_string(),
            TransportResponse::html(format!("<html><body>{}</body></html>", body)),
        );
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_to(&self, url: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == url).count()
    }
}

#[async_trait]
impl Transport for MockSite {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(self.pages.get(url).cloned().unwrap_or(TransportResponse {
            status: 404,
            content_type: Some("text/html".to_string()),
            body: String::new(),
        }))
    }
}

fn crawler_for(site: Arc<MockSite>, max_concurrent: usize) -> Crawler {
    let fetcher = Fetcher::new(site, max_concurrent).unwrap();
    Crawler::new(fetcher, Arc::new(TracingObserver::new(true)))
}

#[tokio::test]
async fn test_scenario_root_only_canonicalization() {
    let site = Arc::new(MockSite::new().page(
        "https://example.com",
        &[
            "/a",
            "https://other.com/x",
            "https://example.com/b#frag",
            "https://example.com/b/",
        ],
    ));
    let seed = parse_seed("https://example.com", "https").unwrap();

    let graph = crawler_for(site.clone(), 4)
        .start(&seed, CrawlOptions::new(1, true))
        .await;

    let export = graph.export_graph();
    assert_eq!(
        export.urls,
        vec![
            "https://example.com",
            "https://example.com/a",
            "https://example.com/b"
        ]
    );
    assert_eq!(
        export.targets("https://example.com"),
        ["https://example.com/a", "https://example.com/b"]
    );
    assert_eq!(export.edge_count(), 2);
    assert!(!graph.contains("https://other.com/x"));

    // Depth 1: only the seed is fetched
    assert_eq!(site.calls(), vec!["https://example.com"]);
}

#[tokio::test]
async fn test_scenario_depth_zero_no_fetch() {
    let site = Arc::new(MockSite::new().page("https://example.com", &["/a"]));
    let seed = parse_seed("example.com", "https").unwrap();

    let graph = crawler_for(site.clone(), 4)
        .start(&seed, CrawlOptions::new(0, true))
        .await;

    assert_eq!(graph.export_graph().urls, vec!["https://example.com"]);
    assert_eq!(graph.edge_count(), 0);
    assert!(site.calls().is_empty());
}

#[tokio::test]
async fn test_scenario_not_found_child() {
    let site = Arc::new(
        MockSite::new()
            .page("https://example.com", &["/missing", "/ok"])
            .page("https://example.com/ok", &["/ok/deeper"])
            .page("https://example.com/ok/deeper", &[]),
    );
    let seed = parse_seed("https://example.com", "https").unwrap();
    let stats = Arc::new(CrawlStats::new());
    let crawler = Crawler::new(Fetcher::new(site.clone(), 4).unwrap(), stats.clone());

    let graph = crawler.start(&seed, CrawlOptions::new(3, true)).await;

    // The 404 page is still a node, with no children of its own
    assert!(graph.contains("https://example.com/missing"));
    assert!(graph
        .export_graph()
        .targets("https://example.com/missing")
        .is_empty());
    assert_eq!(site.calls_to("https://example.com/missing"), 1);

    // Its sibling branch is unaffected
    assert!(graph.contains("https://example.com/ok/deeper"));
    assert!(graph.has_edge("https://example.com/ok", "https://example.com/ok/deeper"));

    let snapshot = stats.snapshot(&graph);
    assert_eq!(snapshot.error_summary.get("not_found"), Some(&1));
    assert_eq!(snapshot.pages_fetched, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_scenario_racing_registration_single_fetch() {
    // Many pages all link to /shared; it must be fetched exactly once
    let mut site = MockSite::new().with_delay(Duration::from_millis(5));
    let fan_out: Vec<String> = (0..16).map(|i| format!("/p{}", i)).collect();
    let fan_out_refs: Vec<&str> = fan_out.iter().map(String::as_str).collect();
    site = site.page("https://example.com", &fan_out_refs);
    for p in &fan_out {
        site = site.page(&format!("https://example.com{}", p), &["/shared", "/"]);
    }
    site = site.page("https://example.com/shared", &[]);
    let site = Arc::new(site);

    let seed = parse_seed("https://example.com", "https").unwrap();
    let graph = crawler_for(site.clone(), 8)
        .start(&seed, CrawlOptions::new(3, true))
        .await;

    assert_eq!(site.calls_to("https://example.com/shared"), 1);
    assert_eq!(site.calls_to("https://example.com"), 1);
    assert_eq!(graph.node_count(), 18);
    // Every /pN records its edge to /shared even though only one fetched it
    for p in &fan_out {
        assert!(graph.has_edge(
            &format!("https://example.com{}", p),
            "https://example.com/shared"
        ));
    }
}

#[tokio::test]
async fn test_depth_bound() {
    let site = Arc::new(
        MockSite::new()
            .page("https://example.com", &["/1"])
            .page("https://example.com/1", &["/2"])
            .page("https://example.com/2", &["/3"])
            .page("https://example.com/3", &["/4"]),
    );
    let seed = parse_seed("https://example.com", "https").unwrap();

    let graph = crawler_for(site.clone(), 2)
        .start(&seed, CrawlOptions::new(2, true))
        .await;

    assert!(graph.contains("https://example.com/1"));
    assert!(graph.contains("https://example.com/2"));
    assert!(!graph.contains("https://example.com/3"));
    assert_eq!(site.calls_to("https://example.com/2"), 0);
}

#[tokio::test]
async fn test_host_filter_excludes_foreign_edges() {
    let site = Arc::new(
        MockSite::new()
            .page(
                "https://example.com",
                &[
                    "https://blog.example.com/post",
                    "https://evil.com/example.com",
                    "https://notexample.com",
                    "/about",
                ],
            )
            .page("https://blog.example.com/post", &["https://cdn.other.net/x"]),
    );
    let seed = parse_seed("https://example.com", "https").unwrap();

    let graph = crawler_for(site, 4)
        .start(
            &seed,
            CrawlOptions::new(3, true).with_scope(ScopePolicy::SameDomain),
        )
        .await;

    let export = graph.export_graph();
    for targets in export.connections.values() {
        for target in targets {
            let host = url::Url::parse(target).unwrap().host_str().unwrap().to_string();
            assert!(
                host == "example.com" || host.ends_with(".example.com"),
                "edge to out-of-scope host {}",
                host
            );
        }
    }
    assert!(graph.contains("https://blog.example.com/post"));
    assert!(graph.contains("https://example.com/about"));
}

#[tokio::test]
async fn test_legacy_contains_scope_over_matches() {
    let site = Arc::new(MockSite::new().page(
        "https://example.com",
        &["https://evil.com/example.com", "https://other.com"],
    ));
    let seed = parse_seed("https://example.com", "https").unwrap();

    let graph = crawler_for(site, 4)
        .start(
            &seed,
            CrawlOptions::new(1, true).with_scope(ScopePolicy::Contains),
        )
        .await;

    assert!(graph.contains("https://evil.com/example.com"));
    assert!(!graph.contains("https://other.com"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_admission_bound_under_fan_out() {
    let mut site = MockSite::new().with_delay(Duration::from_millis(10));
    let children: Vec<String> = (0..40).map(|i| format!("/c{}", i)).collect();
    let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();
    site = site.page("https://example.com", &child_refs);
    for c in &children {
        site = site.page(&format!("https://example.com{}", c), &["/"]);
    }
    let site = Arc::new(site);

    let seed = parse_seed("https://example.com", "https").unwrap();
    let graph = crawler_for(site.clone(), 3)
        .start(&seed, CrawlOptions::new(2, true))
        .await;

    assert_eq!(graph.node_count(), 41);
    assert_eq!(site.calls().len(), 41);
    let peak = site.peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "observed {} simultaneous fetches", peak);
}

#[tokio::test]
async fn test_sitemap_export_after_crawl() {
    let site = Arc::new(MockSite::new().page("https://example.com", &["/a?x=1&y=2"]));
    let seed = parse_seed("https://example.com", "https").unwrap();

    let graph = crawler_for(site, 1)
        .start(&seed, CrawlOptions::new(1, true))
        .await;

    let expected = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<urlset xmlns=\"https://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        "  <url><loc>https://example.com</loc></url>\n",
        "  <url><loc>https://example.com/a?x=1&amp;y=2</loc></url>\n",
        "</urlset>\n",
    );
    assert_eq!(graph.export_sitemap(), expected);
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r#"<html><body>
                <a href="/a">A</a>
                <a href=" {}/b/ ">B</a>
                <a href="/doc.pdf">PDF</a>
                <a href="/missing">Missing</a>
                <a href="https://elsewhere.example.org/">Elsewhere</a>
                <!-- <a href="/commented">hidden</a> -->
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/">home</a><a href="b">sibling</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(r#"<a href="/a#top">a</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF".to_vec(), "application/pdf"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = Config::for_seed(base_url.clone());
    config.crawler.max_depth = 3;
    config.crawler.max_concurrent_fetches = 2;
    config.crawler.scope = ScopePolicy::SameHost;

    let report = crawl(&config, CancellationToken::new())
        .await
        .expect("crawl should succeed");

    let graph = report.graph;
    let home = base_url.clone();
    let a = format!("{}/a", base_url);
    let b = format!("{}/b", base_url);

    assert_eq!(graph.node_count(), 5);
    assert!(graph.contains(&home));
    assert!(graph.contains(&format!("{}/doc.pdf", base_url)));
    assert!(graph.contains(&format!("{}/missing", base_url)));
    assert!(!graph.contains(&format!("{}/commented", base_url)));
    assert!(!graph.contains("https://elsewhere.example.org"));

    assert!(graph.has_edge(&home, &a));
    assert!(graph.has_edge(&home, &b));
    assert!(graph.has_edge(&a, &home));
    assert!(graph.has_edge(&a, &b));
    assert!(graph.has_edge(&b, &a));

    let stats = report.statistics;
    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.error_summary.get("not_found"), Some(&1));
    assert_eq!(stats.error_summary.get("unsupported_content_type"), Some(&1));
    assert_eq!(stats.links_out_of_scope, 1);
    assert!(!stats.cancelled);
}

#[tokio::test]
async fn test_invalid_config_fails_before_network() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<a href=\"/a\">a</a>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = Config::for_seed(mock_server.uri());
    config.crawler.max_concurrent_fetches = 0;

    let result = crawl(&config, CancellationToken::new()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_timeout_cancellation_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<a href=\"/next\">next</a>").set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;

    let config = Config::for_seed(mock_server.uri());
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let report = tokio::time::timeout(Duration::from_secs(10), crawl(&config, cancel))
        .await
        .expect("cancelled crawl should return promptly")
        .expect("crawl should succeed");

    assert_eq!(report.graph.node_count(), 1);
    assert!(report.statistics.cancelled);
}
