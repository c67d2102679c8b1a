//! Directed reachability walks.
//!
//! [`traverse`] collects the nodes and edges reachable from a start node by
//! following outgoing edges. The walk is depth-first and reports discovery
//! order, matching what a recursive walk would produce, but keeps its frames
//! on an explicit stack so deep hierarchies cannot exhaust the call stack.
//!
//! # Skip Rules
//!
//! For each outgoing edge of the node being explored:
//!
//! 1. An edge with a hidden endpoint is skipped entirely (unless
//!    [`TraverseOptions::include_hidden`] is set).
//! 2. A self-loop is skipped entirely.
//! 3. Any other edge is recorded once, keyed by edge ID.
//! 4. An already visited target is not explored again; this is what makes
//!    the walk terminate on cycles.

use crate::domain::{Edge, Node, NodeId};
use crate::error::Result;
use crate::model::GraphModel;
use petgraph::graph::{EdgeIndex, NodeIndex};
use std::collections::HashSet;

/// Inclusion rules for [`traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraverseOptions {
    /// Keep the start node in the result (default `true`).
    pub include_self: bool,

    /// Explore a single hop only (default `false`).
    pub direct_only: bool,

    /// Walk through hidden nodes as if they were visible (default `false`).
    pub include_hidden: bool,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        Self {
            include_self: true,
            direct_only: false,
            include_hidden: false,
        }
    }
}

impl TraverseOptions {
    /// Options for collecting descendants only.
    #[must_use]
    pub fn descendants() -> Self {
        Self {
            include_self: false,
            ..Self::default()
        }
    }

    /// Options for collecting direct children only.
    #[must_use]
    pub fn direct_children() -> Self {
        Self {
            include_self: false,
            direct_only: true,
            ..Self::default()
        }
    }

    /// Builder-style setter for [`TraverseOptions::include_hidden`].
    #[must_use]
    pub fn through_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }
}

/// The nodes and edges reached by a walk, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachable<'g> {
    /// Reached nodes; the start node first when it is included.
    pub nodes: Vec<&'g Node>,

    /// Traversed edges, each at most once.
    pub edges: Vec<&'g Edge>,
}

impl Reachable<'_> {
    /// IDs of the reached nodes, in discovery order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Whether the walk collected no node and no edge.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// One suspended exploration: a node and the position in its outgoing edges.
struct Frame {
    out: Vec<(EdgeIndex, NodeIndex)>,
    next: usize,
    node: NodeIndex,
}

/// Walk outgoing edges from `start` and collect everything reachable.
///
/// Runs in O(V + E) over the reachable subgraph, terminates on cyclic
/// graphs, and never modifies `graph`.
///
/// # Errors
///
/// Returns [`crate::Error::NodeNotFound`] if `start` is not in the snapshot.
pub fn traverse<'g>(
    graph: &'g GraphModel,
    start: NodeId,
    options: TraverseOptions,
) -> Result<Reachable<'g>> {
    let start_idx = graph.index_of(start)?;

    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut recorded: HashSet<EdgeIndex> = HashSet::new();
    let mut nodes: Vec<&'g Node> = Vec::new();
    let mut edges: Vec<&'g Edge> = Vec::new();

    visited.insert(start_idx);
    nodes.push(graph.node_at(start_idx));

    let mut stack = vec![Frame {
        out: graph.outgoing(start_idx),
        next: 0,
        node: start_idx,
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(&(edge_idx, target)) = frame.out.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;
        let current = frame.node;

        let edge = graph.edge_at(edge_idx);
        if !options.include_hidden && graph.is_edge_hidden(edge) {
            continue;
        }
        if target == current {
            continue;
        }

        if recorded.insert(edge_idx) {
            edges.push(edge);
        }

        if !visited.insert(target) {
            continue;
        }
        nodes.push(graph.node_at(target));

        if !options.direct_only {
            stack.push(Frame {
                out: graph.outgoing(target),
                next: 0,
                node: target,
            });
        }
    }

    if !options.include_self {
        nodes.retain(|n| n.id != start);
    }

    tracing::debug!(
        %start,
        nodes = nodes.len(),
        edges = edges.len(),
        direct_only = options.direct_only,
        "Traversal complete"
    );

    Ok(Reachable { nodes, edges })
}

/// Everything currently visible: non-hidden nodes, and edges whose endpoints
/// are both visible. Both lists keep snapshot order.
#[must_use]
pub fn visible(graph: &GraphModel) -> Reachable<'_> {
    Reachable {
        nodes: graph.nodes().filter(|n| !n.hidden).collect(),
        edges: graph.edges().filter(|e| !graph.is_edge_hidden(e)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeGroup;
    use crate::error::Error;
    use crate::model::fixtures::{edge, node};
    use rstest::{fixture, rstest};

    fn ids(values: &[u64]) -> Vec<NodeId> {
        values.iter().copied().map(NodeId).collect()
    }

    fn edge_ids(reach: &Reachable<'_>) -> Vec<String> {
        reach.edges.iter().map(|e| e.id.to_string()).collect()
    }

    /// 1 -> 2 -> 4, 1 -> 3 -> 4, 4 -> 2 (cycle), 3 -> 3 (self-loop)
    #[fixture]
    fn cyclic() -> GraphModel {
        GraphModel::new(
            vec![
                node(1, NodeGroup::Prog),
                node(2, NodeGroup::Func),
                node(3, NodeGroup::Meth),
                node(4, NodeGroup::Tabl),
            ],
            vec![edge(1, 2), edge(1, 3), edge(2, 4), edge(3, 4), edge(4, 2), edge(3, 3)],
        )
        .unwrap()
    }

    #[test]
    fn test_discovery_order_scenario() {
        let graph = GraphModel::new(
            vec![
                node(1, NodeGroup::Prog),
                node(2, NodeGroup::Func),
                node(3, NodeGroup::Tabl),
            ],
            vec![edge(1, 2), edge(1, 3)],
        )
        .unwrap();

        let reach = traverse(&graph, NodeId(1), TraverseOptions::default()).unwrap();

        assert_eq!(reach.node_ids(), ids(&[1, 2, 3]));
        assert_eq!(edge_ids(&reach), vec!["1-2", "1-3"]);
    }

    #[rstest]
    fn test_depth_first_order(cyclic: GraphModel) {
        let reach = traverse(&cyclic, NodeId(1), TraverseOptions::default()).unwrap();

        assert_eq!(reach.node_ids(), ids(&[1, 2, 4, 3]));
        assert_eq!(edge_ids(&reach), vec!["1-2", "2-4", "4-2", "1-3", "3-4"]);
    }

    #[rstest]
    fn test_cycle_terminates_without_duplicate_edges(cyclic: GraphModel) {
        let reach = traverse(&cyclic, NodeId(2), TraverseOptions::default()).unwrap();

        assert_eq!(reach.node_ids(), ids(&[2, 4]));
        assert_eq!(edge_ids(&reach), vec!["2-4", "4-2"]);
    }

    #[rstest]
    fn test_self_loop_is_skipped(cyclic: GraphModel) {
        let reach = traverse(&cyclic, NodeId(3), TraverseOptions::default()).unwrap();

        assert_eq!(reach.node_ids(), ids(&[3, 4, 2]));
        assert!(!edge_ids(&reach).contains(&"3-3".to_string()));
    }

    #[rstest]
    fn test_exclude_self_keeps_edges(cyclic: GraphModel) {
        let with_self = traverse(&cyclic, NodeId(1), TraverseOptions::default()).unwrap();
        let without = traverse(&cyclic, NodeId(1), TraverseOptions::descendants()).unwrap();

        assert_eq!(without.node_ids(), ids(&[2, 4, 3]));
        assert_eq!(with_self.edges, without.edges);
    }

    #[rstest]
    fn test_direct_only_explores_one_hop(cyclic: GraphModel) {
        let options = TraverseOptions {
            direct_only: true,
            ..TraverseOptions::default()
        };
        let reach = traverse(&cyclic, NodeId(1), options).unwrap();

        assert_eq!(reach.node_ids(), ids(&[1, 2, 3]));
        assert_eq!(edge_ids(&reach), vec!["1-2", "1-3"]);

        let children = traverse(&cyclic, NodeId(1), TraverseOptions::direct_children()).unwrap();
        assert_eq!(children.node_ids(), ids(&[2, 3]));
    }

    #[rstest]
    fn test_hidden_endpoints_block_the_walk(cyclic: GraphModel) {
        let hidden = [NodeId(2)].into_iter().collect();
        let graph = cyclic.with_hidden(&hidden, true);

        let reach = traverse(&graph, NodeId(1), TraverseOptions::default()).unwrap();
        assert_eq!(reach.node_ids(), ids(&[1, 3, 4]));
        assert_eq!(edge_ids(&reach), vec!["1-3", "3-4"]);

        let through = traverse(
            &graph,
            NodeId(1),
            TraverseOptions::default().through_hidden(true),
        )
        .unwrap();
        assert_eq!(through.node_ids(), ids(&[1, 2, 4, 3]));
    }

    #[test]
    fn test_unknown_start_node() {
        let graph = GraphModel::new(vec![node(1, NodeGroup::Prog)], vec![]).unwrap();
        let result = traverse(&graph, NodeId(5), TraverseOptions::default());
        assert!(matches!(result, Err(Error::NodeNotFound(NodeId(5)))));
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let count = 50_000_u64;
        let nodes = (0..count).map(|i| node(i, NodeGroup::Func)).collect();
        let edges = (1..count).map(|i| edge(i - 1, i)).collect();
        let graph = GraphModel::new(nodes, edges).unwrap();

        let reach = traverse(&graph, NodeId(0), TraverseOptions::default()).unwrap();
        assert_eq!(reach.nodes.len(), 50_000);
        assert_eq!(reach.edges.len(), 49_999);
    }

    #[rstest]
    fn test_visible_view_filters_hidden(cyclic: GraphModel) {
        let hidden = [NodeId(4)].into_iter().collect();
        let graph = cyclic.with_hidden(&hidden, true);

        let view = visible(&graph);
        assert_eq!(view.node_ids(), ids(&[1, 2, 3]));
        assert_eq!(edge_ids(&view), vec!["1-2", "1-3", "3-3"]);
    }
}
