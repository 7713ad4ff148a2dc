use crate::url::ScopePolicy;
use serde::Deserialize;
use std::path::PathBuf;

/// Depth used when neither the config file nor the CLI sets one
pub const DEFAULT_MAX_DEPTH: i64 = 13;

/// Admission gate capacity used when none is configured
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 10;

/// Main configuration structure for sitemapper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration with default settings for `seed`
    pub fn for_seed(seed: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig::new(seed),
            output: OutputConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL (or bare host) the crawl starts from
    ///
    /// May be left out of a file when the command line supplies it.
    #[serde(default)]
    pub seed: String,

    /// Maximum number of links followed from the seed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: i64,

    /// Only follow links inside the seed's site
    #[serde(rename = "root-only", default = "default_true")]
    pub root_only: bool,

    /// How "inside the seed's site" is decided when `root_only` is set
    #[serde(default)]
    pub scope: ScopePolicy,

    /// Scheme given to a seed written without one
    #[serde(rename = "default-scheme", default = "default_scheme")]
    pub default_scheme: String,

    /// Maximum number of fetches using the network at once
    #[serde(
        rename = "max-concurrent-fetches",
        default = "default_max_concurrent_fetches"
    )]
    pub max_concurrent_fetches: usize,

    /// Report every failed fetch at warn level
    #[serde(default)]
    pub debug: bool,

    /// Stop the crawl after this many seconds, keeping partial results
    #[serde(rename = "timeout-secs", default)]
    pub timeout_secs: Option<u64>,
}

impl CrawlerConfig {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            root_only: true,
            scope: ScopePolicy::default(),
            default_scheme: default_scheme(),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            debug: false,
            timeout_secs: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// File for the JSON graph; stdout when unset
    #[serde(rename = "json-path", default)]
    pub json_path: Option<PathBuf>,

    /// Also emit a sitemaps.org document
    #[serde(default)]
    pub sitemap: bool,

    /// File for the sitemap; stdout when unset
    #[serde(rename = "sitemap-path", default)]
    pub sitemap_path: Option<PathBuf>,
}

fn default_max_depth() -> i64 {
    DEFAULT_MAX_DEPTH
}

fn default_true() -> bool {
    true
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_max_concurrent_fetches() -> usize {
    DEFAULT_MAX_CONCURRENT_FETCHES
}
