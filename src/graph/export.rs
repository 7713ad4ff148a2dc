use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// JSON view of a link graph
///
/// `urls` lists every node; `connections` maps each node to the URLs it
/// links to (empty for pages that were not expanded). Both are sorted so
/// repeated crawls of an unchanged site produce identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    pub urls: Vec<String>,
    pub connections: BTreeMap<String, Vec<String>>,
}

impl GraphExport {
    pub(crate) fn from_parts(
        nodes: &HashSet<String>,
        edges: &HashMap<String, HashSet<String>>,
    ) -> Self {
        let mut urls: Vec<String> = nodes.iter().cloned().collect();
        urls.sort();

        let mut connections: BTreeMap<String, Vec<String>> = urls
            .iter()
            .map(|url| (url.clone(), Vec::new()))
            .collect();

        for (source, targets) in edges {
            let mut targets: Vec<String> = targets.iter().cloned().collect();
            targets.sort();
            connections.insert(source.clone(), targets);
        }

        Self { urls, connections }
    }

    /// Total number of recorded edges
    pub fn edge_count(&self) -> usize {
        self.connections.values().map(Vec::len).sum()
    }

    /// Targets recorded for `source`, if any
    pub fn targets(&self, source: &str) -> &[String] {
        self.connections
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
