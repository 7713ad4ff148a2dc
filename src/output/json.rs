use crate::graph::GraphExport;
use crate::SitemapperError;
use std::io::Write;

/// Writes the graph as pretty-printed JSON followed by a newline
pub fn write_json<W: Write>(graph: &GraphExport, mut writer: W) -> Result<(), SitemapperError> {
    serde_json::to_writer_pretty(&mut writer, graph)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
