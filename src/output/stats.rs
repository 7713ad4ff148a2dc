//! End-of-crawl statistics
//!
//! Counters are collected by [`crate::crawler::CrawlStats`] while the crawl
//! runs; this module holds the final snapshot and its text rendering.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Pages registered in the graph
    pub total_pages: u64,

    /// Edges recorded in the graph
    pub total_links: u64,

    /// Fetches that returned HTML and yielded links
    pub pages_fetched: u64,

    /// Raw hrefs returned by the fetcher
    pub links_extracted: u64,

    /// Hrefs that could not be turned into a canonical URL
    pub links_malformed: u64,

    /// Canonical links dropped by the scope policy
    pub links_out_of_scope: u64,

    /// Failed fetches by error kind
    pub error_summary: BTreeMap<&'static str, u64>,

    /// Wall-clock time of the crawl
    pub elapsed: Duration,

    /// Whether the crawl was stopped before finishing
    pub cancelled: bool,
}

impl CrawlStatistics {
    /// Total number of failed fetches
    pub fn total_errors(&self) -> u64 {
        self.error_summary.values().sum()
    }

    /// Share of attempted fetches that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.total_errors();
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / attempted as f64) * 100.0
    }
}

/// Writes statistics in a human-readable layout
pub fn write_statistics<W: Write>(stats: &CrawlStatistics, mut out: W) -> io::Result<()> {
    writeln!(out, "=== Crawl Statistics ===\n")?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Pages in graph: {}", stats.total_pages)?;
    writeln!(out, "  Links in graph: {}", stats.total_links)?;
    writeln!(out, "  Pages fetched: {}", stats.pages_fetched)?;
    writeln!(out, "  Links extracted: {}", stats.links_extracted)?;
    writeln!(out, "  Malformed links skipped: {}", stats.links_malformed)?;
    writeln!(out, "  Out-of-scope links skipped: {}", stats.links_out_of_scope)?;
    writeln!(out, "  Elapsed: {:.2}s", stats.elapsed.as_secs_f64())?;
    if stats.cancelled {
        writeln!(out, "  Crawl was cancelled; results are partial")?;
    }
    writeln!(out)?;

    if !stats.error_summary.is_empty() {
        writeln!(out, "Error Summary:")?;
        let mut error_counts: Vec<_> = stats.error_summary.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (kind, count) in error_counts {
            writeln!(out, "  {}: {}", kind, count)?;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} fetches succeeded)",
        stats.success_rate(),
        stats.pages_fetched,
        stats.pages_fetched + stats.total_errors()
    )
}

/// Prints statistics to stderr so stdout stays free for graph output
pub fn print_statistics(stats: &CrawlStatistics) {
    let stderr = io::stderr();
    if let Err(e) = write_statistics(stats, stderr.lock()) {
        tracing::warn!("Failed to print statistics: {}", e);
    }
}
