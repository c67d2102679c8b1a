//! Snapshot loading from query results.
//!
//! Two shapes are accepted:
//!
//! - a snapshot document, `{ "nodes": [...], "edges": [...] }`
//! - link records as produced by the query layer, one relationship per
//!   record: `{ "link": { "from": Node, "to": Node, "edge": Edge } }`
//!
//! Link records arrive either as a JSON array or as JSON Lines. They are
//! flattened the way the query layer does it: each record contributes its
//! `from` node, its `to` node and its edge, and duplicates keep the first
//! occurrence. The first node of the first record therefore becomes the root.
//!
//! # Resilient Loading
//!
//! A malformed line in JSON Lines input is skipped and recorded as a
//! [`GraphWarning::MalformedRecord`] instead of failing the whole load.

use crate::domain::{Edge, EdgeId, Node, NodeId};
use crate::error::{GraphWarning, Result};
use crate::model::GraphModel;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

/// Edge as delivered by the query layer; the ID may be absent.
#[derive(Debug, Clone, Deserialize)]
struct RawEdge {
    #[serde(default)]
    id: Option<EdgeId>,
    from: NodeId,
    to: NodeId,
    #[serde(default, rename = "type", alias = "label")]
    relation: Option<String>,
}

impl From<RawEdge> for Edge {
    fn from(raw: RawEdge) -> Self {
        Self {
            id: raw.id.unwrap_or_else(|| EdgeId::between(raw.from, raw.to)),
            from: raw.from,
            to: raw.to,
            relation: raw.relation,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Link {
    from: Node,
    to: Node,
    edge: RawEdge,
}

/// A query-result record, with or without the `link` wrapper.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LinkRecord {
    Wrapped { link: Link },
    Bare(Link),
}

impl LinkRecord {
    fn into_link(self) -> Link {
        match self {
            Self::Wrapped { link } | Self::Bare(link) => link,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum GraphDocument {
    Snapshot {
        nodes: Vec<Node>,
        #[serde(default)]
        edges: Vec<RawEdge>,
    },
    Links(Vec<LinkRecord>),
}

/// Flattens link records into de-duplicated node and edge lists.
#[derive(Debug, Default)]
struct LinkCollector {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_ids: HashSet<NodeId>,
    edge_ids: HashSet<EdgeId>,
}

impl LinkCollector {
    fn push(&mut self, link: Link) {
        for node in [link.from, link.to] {
            if self.node_ids.insert(node.id) {
                self.nodes.push(node);
            }
        }
        let edge = Edge::from(link.edge);
        if self.edge_ids.insert(edge.id.clone()) {
            self.edges.push(edge);
        }
    }

    fn finish(self, warnings: Vec<GraphWarning>) -> Result<GraphModel> {
        Ok(GraphModel::new(self.nodes, self.edges)?.with_load_warnings(warnings))
    }
}

/// Parse a JSON document: a snapshot object or an array of link records.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] for undecodable input and [`crate::Error::EmptyGraph`]
/// when no node is present.
pub fn from_json_str(input: &str) -> Result<GraphModel> {
    match serde_json::from_str::<GraphDocument>(input)? {
        GraphDocument::Snapshot { nodes, edges } => {
            GraphModel::new(nodes, edges.into_iter().map(Edge::from).collect())
        }
        GraphDocument::Links(records) => {
            let mut collector = LinkCollector::default();
            for record in records {
                collector.push(record.into_link());
            }
            collector.finish(Vec::new())
        }
    }
}

/// Parse JSON Lines of link records, skipping malformed lines.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if reading fails and [`crate::Error::EmptyGraph`] when no
/// record could be decoded.
pub fn from_jsonl_reader<R: BufRead>(reader: R) -> Result<GraphModel> {
    let mut collector = LinkCollector::default();
    let mut warnings = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<LinkRecord>(&line) {
            Ok(record) => collector.push(record.into_link()),
            Err(e) => {
                tracing::warn!(line = line_number, error = %e, "Skipping malformed record");
                warnings.push(GraphWarning::MalformedRecord {
                    line: line_number,
                    error: e.to_string(),
                });
            }
        }
    }

    collector.finish(warnings)
}

/// Load a snapshot file. Files ending in `.jsonl` are read as JSON Lines,
/// anything else as a JSON document.
///
/// # Errors
///
/// See [`from_json_str`] and [`from_jsonl_reader`].
pub fn load(path: &Path) -> Result<GraphModel> {
    let is_lines = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"));

    tracing::debug!(path = %path.display(), lines = is_lines, "Loading snapshot");

    if is_lines {
        let file = std::fs::File::open(path)?;
        from_jsonl_reader(std::io::BufReader::new(file))
    } else {
        let content = std::fs::read_to_string(path)?;
        from_json_str(&content)
    }
}
