//! sitemapper main entry point
//!
//! This is the command-line interface for the sitemapper crawler.

use anyhow::{bail, Context};
use clap::Parser;
use sitemapper::config::{read_config, validate, Config};
use sitemapper::crawler::crawl;
use sitemapper::output::{print_statistics, write_outputs};
use sitemapper::url::ScopePolicy;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// sitemapper: map the link structure of a website
///
/// Crawls from a seed URL up to a bounded depth and prints the discovered
/// link graph as JSON, optionally followed by a sitemaps.org document.
#[derive(Parser, Debug)]
#[command(name = "sitemapper")]
#[command(version)]
#[command(about = "Crawl a site and export its link graph", long_about = None)]
struct Cli {
    /// Seed URL or bare domain to crawl (overrides the config file)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of links to follow from the seed
    #[arg(short, long)]
    depth: Option<i64>,

    /// Only follow links inside the seed's site
    #[arg(long, value_name = "BOOL")]
    root_only: Option<bool>,

    /// How "inside the seed's site" is decided
    #[arg(long, value_enum)]
    scope: Option<ScopePolicy>,

    /// Scheme for a seed given without one
    #[arg(long, value_name = "SCHEME")]
    scheme: Option<String>,

    /// Maximum number of simultaneous fetches
    #[arg(short = 'n', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Stop after this many seconds and output what was found
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Write the JSON graph to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also emit a sitemaps.org XML document
    #[arg(long)]
    sitemap: bool,

    /// Write the sitemap to a file instead of stdout (implies --sitemap)
    #[arg(long, value_name = "FILE")]
    sitemap_path: Option<PathBuf>,

    /// Report every failed fetch
    #[arg(long)]
    debug: bool,

    /// Print crawl statistics to stderr when done
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.debug, cli.quiet);

    let config = build_config(&cli)?;

    let cancel = CancellationToken::new();
    spawn_cancel_triggers(&cancel, config.crawler.timeout_secs);

    let report = crawl(&config, cancel).await.context("Crawl failed")?;

    write_outputs(&report.graph, &config.output).context("Failed to write output")?;

    if cli.stats {
        print_statistics(&report.statistics);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries the crawl output.
fn setup_logging(verbose: u8, debug: bool, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose.max(u8::from(debug)) {
            0 => EnvFilter::new("sitemapper=info,warn"),
            1 => EnvFilter::new("sitemapper=debug,info"),
            2 => EnvFilter::new("sitemapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match (&cli.config, &cli.seed) {
        (Some(path), _) => {
            tracing::info!("Loading configuration from: {}", path.display());
            read_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        (None, Some(seed)) => Config::for_seed(seed.clone()),
        (None, None) => bail!("a seed URL or --config file is required"),
    };

    let crawler = &mut config.crawler;
    if let Some(seed) = &cli.seed {
        crawler.seed = seed.clone();
    }
    if let Some(depth) = cli.depth {
        crawler.max_depth = depth;
    }
    if let Some(root_only) = cli.root_only {
        crawler.root_only = root_only;
    }
    if let Some(scope) = cli.scope {
        crawler.scope = scope;
    }
    if let Some(scheme) = &cli.scheme {
        crawler.default_scheme = scheme.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        crawler.max_concurrent_fetches = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        crawler.timeout_secs = Some(timeout);
    }
    crawler.debug |= cli.debug;

    let output = &mut config.output;
    if let Some(path) = &cli.output {
        output.json_path = Some(path.clone());
    }
    if let Some(path) = &cli.sitemap_path {
        output.sitemap_path = Some(path.clone());
        output.sitemap = true;
    }
    output.sitemap |= cli.sitemap;

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Cancels the crawl on Ctrl-C or when the configured timeout expires
fn spawn_cancel_triggers(cancel: &CancellationToken, timeout_secs: Option<u64>) {
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing with partial results");
            on_signal.cancel();
        }
    });

    if let Some(secs) = timeout_secs {
        let on_timeout = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            tracing::warn!("Crawl timeout of {}s reached", secs);
            on_timeout.cancel();
        });
    }
}
