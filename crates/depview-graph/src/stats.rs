//! Summary figures for the info bar, legend and node inspection.

use crate::domain::{NodeGroup, NodeId};
use crate::error::Result;
use crate::model::GraphModel;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Counts over the visible part of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    /// Visible nodes
    pub nodes: usize,
    /// Visible edges
    pub edges: usize,
    /// Visible database tables
    pub tables: usize,
    /// Visible system (non-custom) objects
    pub system: usize,
}

impl GraphStats {
    /// Compute statistics for `graph`.
    #[must_use]
    pub fn of(graph: &GraphModel) -> Self {
        let mut stats = graph
            .nodes()
            .filter(|n| !n.hidden)
            .fold(Self::default(), |mut acc, n| {
                acc.nodes += 1;
                if n.group == NodeGroup::Tabl {
                    acc.tables += 1;
                }
                if !n.is_custom {
                    acc.system += 1;
                }
                acc
            });
        stats.edges = graph.edges().filter(|e| !graph.is_edge_hidden(e)).count();
        stats
    }
}

/// Relationship summary of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    /// The inspected node
    pub id: NodeId,
    /// Distinct nodes with an edge into this node
    pub inbound: usize,
    /// Distinct nodes this node has an edge to
    pub outbound: usize,
    /// The node's technical name
    pub description: String,
}

/// Summarize the relationships of `id`.
///
/// Counts are over the whole snapshot, hidden neighbours included.
///
/// # Errors
///
/// Returns [`crate::Error::NodeNotFound`] if `id` is not in `graph`.
pub fn inspect(graph: &GraphModel, id: NodeId) -> Result<NodeSummary> {
    let node = graph.lookup_node(id)?;
    let inbound: HashSet<NodeId> = graph.edges_to(id)?.iter().map(|e| e.from).collect();
    let outbound: HashSet<NodeId> = graph.edges_from(id)?.iter().map(|e| e.to).collect();

    Ok(NodeSummary {
        id,
        inbound: inbound.len(),
        outbound: outbound.len(),
        description: node.technical_name.clone(),
    })
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    /// Group tag
    pub group: NodeGroup,
    /// Configured color, if any
    pub color: Option<String>,
}

/// Distinct groups present in `graph`, sorted by tag, with their colors.
#[must_use]
pub fn legend(graph: &GraphModel, palette: &BTreeMap<NodeGroup, String>) -> Vec<LegendEntry> {
    let mut groups: Vec<NodeGroup> = graph
        .nodes()
        .map(|n| n.group)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    groups.sort_by_key(|g| g.as_str());
    groups
        .into_iter()
        .map(|group| LegendEntry {
            group,
            color: palette.get(&group).cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Node;
    use crate::model::fixtures::{edge, node};

    fn graph() -> GraphModel {
        GraphModel::new(
            vec![
                node(1, NodeGroup::Prog).custom(),
                node(2, NodeGroup::Tabl),
                node(3, NodeGroup::Tabl).custom(),
                node(4, NodeGroup::Func),
            ],
            vec![edge(1, 2), edge(1, 3), edge(4, 2), edge(1, 4), edge(4, 1)],
        )
        .unwrap()
    }

    #[test]
    fn test_stats_count_visible_only() {
        let graph = graph();
        assert_eq!(
            GraphStats::of(&graph),
            GraphStats {
                nodes: 4,
                edges: 5,
                tables: 2,
                system: 2
            }
        );

        let hidden = [NodeId(2)].into_iter().collect();
        let stats = GraphStats::of(&graph.with_hidden(&hidden, true));
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.edges, 3);
        assert_eq!(stats.tables, 1);
        assert_eq!(stats.system, 1);
    }

    #[test]
    fn test_inspect_counts_distinct_neighbours() {
        let graph = graph();
        let summary = inspect(&graph, NodeId(1)).unwrap();
        assert_eq!(summary.inbound, 1);
        assert_eq!(summary.outbound, 3);
        assert_eq!(summary.description, "ZN1");

        let table = inspect(&graph, NodeId(2)).unwrap();
        assert_eq!(table.inbound, 2);
        assert_eq!(table.outbound, 0);
    }

    #[test]
    fn test_inspect_unknown_node() {
        assert!(inspect(&graph(), NodeId(9)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_legend_sorted_with_colors() {
        let graph = GraphModel::new(
            vec![
                Node::new(1, NodeGroup::View, "v", "V"),
                Node::new(2, NodeGroup::Dtel, "d", "D"),
                Node::new(3, NodeGroup::Func, "f", "F"),
            ],
            vec![],
        )
        .unwrap();
        let palette = [(NodeGroup::Func, "#f5ab70".to_string())].into_iter().collect();

        let entries = legend(&graph, &palette);
        let tags: Vec<&str> = entries.iter().map(|e| e.group.as_str()).collect();
        assert_eq!(tags, vec!["DTEL", "FUNC", "VIEW"]);
        assert_eq!(entries[1].color.as_deref(), Some("#f5ab70"));
        assert_eq!(entries[0].color, None);
    }
}
