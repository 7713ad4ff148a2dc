//! Configuration module for sitemapper
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags. Validation runs before any network activity.
//!
//! # Example
//!
//! ```no_run
//! use sitemapper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitemapper.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, DEFAULT_MAX_CONCURRENT_FETCHES, DEFAULT_MAX_DEPTH,
};

// Re-export parser functions
pub use parser::{load_config, parse_config, read_config};
pub use validation::{validate, MAX_CONCURRENT_FETCHES};
