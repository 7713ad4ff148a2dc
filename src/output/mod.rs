//! Output module for crawl results
//!
//! This module handles:
//! - Encoding the link graph as JSON
//! - Rendering the sitemaps.org XML document
//! - Summarizing crawl statistics

mod json;
mod sitemap;
pub mod stats;

pub use json::write_json;
pub use sitemap::{render_sitemap, SITEMAP_NAMESPACE};
pub use stats::{print_statistics, write_statistics, CrawlStatistics};

use crate::config::OutputConfig;
use crate::graph::LinkGraph;
use crate::SitemapperError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes the crawl results as configured
///
/// The JSON graph always goes out (to `json_path`, or stdout). The sitemap is
/// written only when enabled, to `sitemap_path` or after the JSON on stdout.
pub fn write_outputs(graph: &LinkGraph, config: &OutputConfig) -> Result<(), SitemapperError> {
    let export = graph.export_graph();
    match &config.json_path {
        Some(path) => {
            write_json(&export, BufWriter::new(File::create(path)?))?;
            tracing::info!("Graph written to {}", path.display());
        }
        None => write_json(&export, io::stdout().lock())?,
    }

    if config.sitemap {
        let xml = graph.export_sitemap();
        match &config.sitemap_path {
            Some(path) => {
                write_text(path, &xml)?;
                tracing::info!("Sitemap written to {}", path.display());
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(xml.as_bytes())?;
                stdout.flush()?;
            }
        }
    }

    Ok(())
}

fn write_text(path: &Path, text: &str) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()
}
