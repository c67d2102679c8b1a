//! Case-insensitive node lookup.
//!
//! Nothing is indexed ahead of time: node sets change with every query
//! result, so each call scans the current snapshot.

use crate::domain::{Node, NodeId};
use crate::error::{Error, Result};

/// Whether `node`'s label or technical name contains the lower-cased `query`.
fn matches(node: &Node, query: &str) -> bool {
    node.label.to_lowercase().contains(query)
        || node.technical_name.to_lowercase().contains(query)
}

/// Find the first node, in input order, whose label or technical name
/// contains `query`, ignoring case.
///
/// An empty query matches the first node.
///
/// # Errors
///
/// Returns [`Error::NoMatch`] when no node matches.
pub fn find<'a, I>(nodes: I, query: &str) -> Result<&'a Node>
where
    I: IntoIterator<Item = &'a Node>,
{
    let needle = query.to_lowercase();
    nodes
        .into_iter()
        .find(|n| matches(n, &needle))
        .ok_or_else(|| Error::NoMatch {
            query: query.to_string(),
        })
}

/// IDs of every node whose label contains `query`, ignoring case.
///
/// This drives the tree view's expanded rows, which match on label only.
pub fn matching_labels<'a, I>(nodes: I, query: &str) -> Vec<NodeId>
where
    I: IntoIterator<Item = &'a Node>,
{
    let needle = query.to_lowercase();
    nodes
        .into_iter()
        .filter(|n| n.label.to_lowercase().contains(&needle))
        .map(|n| n.id)
        .collect()
}
