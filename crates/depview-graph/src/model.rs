//! Immutable graph snapshots.
//!
//! A [`GraphModel`] holds the nodes and edges of one query result together
//! with the derived adjacency. It is built once per result and never mutated:
//! every view-state change produces a new snapshot.
//!
//! # Graph Representation
//!
//! Storage is a petgraph `DiGraph<Node, Edge>` plus an ID-to-index map.
//! Because nothing is ever removed from a snapshot, node and edge indices
//! follow input order, and adjacency is reported in that order.
//!
//! Edge direction follows the data: `from -> to` means `from` uses `to`.

use crate::domain::{Edge, EdgeId, Node, NodeId};
use crate::error::{Error, GraphWarning, Result};
use petgraph::Direction;
use petgraph::algo;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// One immutable snapshot of the dependency graph.
#[derive(Debug, Clone)]
pub struct GraphModel {
    /// Nodes and edges in input order.
    graph: DiGraph<Node, Edge>,

    /// Mapping from `NodeId` to graph index for O(1) lookups.
    ///
    /// Every node in `graph` has an entry.
    index: HashMap<NodeId, NodeIndex>,

    /// Index of the designated root node.
    root: NodeIndex,

    /// Records dropped while building this snapshot.
    warnings: Vec<GraphWarning>,
}

impl GraphModel {
    /// Build a snapshot from raw node and edge records.
    ///
    /// Input problems do not fail the build. Duplicate IDs keep the first
    /// record, edges with an unresolved endpoint are dropped, and each case is
    /// logged and recorded in [`GraphModel::warnings`].
    ///
    /// The root is the first node flagged `is_root`, or the first node when
    /// none is flagged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyGraph`] when `nodes` is empty.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let mut warnings = Vec::new();
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(&node.id) {
                tracing::warn!(node = %node.id, "Dropping duplicate node");
                warnings.push(GraphWarning::DuplicateNode(node.id));
                continue;
            }
            let id = node.id;
            let idx = graph.add_node(node);
            index.insert(id, idx);
        }

        let root = Self::designate_root(&mut graph, &mut warnings);

        let mut seen_edges: HashSet<EdgeId> = HashSet::with_capacity(edges.len());
        for edge in edges {
            let Some(&from) = index.get(&edge.from) else {
                warnings.push(Self::dangling(&edge, edge.from));
                continue;
            };
            let Some(&to) = index.get(&edge.to) else {
                warnings.push(Self::dangling(&edge, edge.to));
                continue;
            };
            if !seen_edges.insert(edge.id.clone()) {
                tracing::warn!(edge = %edge.id, "Dropping duplicate edge");
                warnings.push(GraphWarning::DuplicateEdge(edge.id));
                continue;
            }
            graph.add_edge(from, to, edge);
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            warnings = warnings.len(),
            root = %graph[root].id,
            "Built graph snapshot"
        );

        Ok(Self {
            graph,
            index,
            root,
            warnings,
        })
    }

    fn designate_root(graph: &mut DiGraph<Node, Edge>, warnings: &mut Vec<GraphWarning>) -> NodeIndex {
        let flagged: Vec<NodeIndex> = graph
            .node_indices()
            .filter(|&idx| graph[idx].is_root)
            .collect();

        let root = flagged.first().copied().unwrap_or(NodeIndex::new(0));
        for &extra in flagged.iter().skip(1) {
            tracing::warn!(node = %graph[extra].id, "Clearing extra root flag");
            warnings.push(GraphWarning::ExtraRoot(graph[extra].id));
            graph[extra].is_root = false;
        }
        graph[root].is_root = true;
        root
    }

    fn dangling(edge: &Edge, missing: NodeId) -> GraphWarning {
        tracing::warn!(edge = %edge.id, %missing, "Dropping dangling edge");
        GraphWarning::DanglingEdge {
            edge: edge.id.clone(),
            missing,
        }
    }

    /// Look up a node by ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the ID is not in this snapshot.
    pub fn lookup_node(&self, id: NodeId) -> Result<&Node> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Whether the snapshot contains a node with this ID.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Outgoing edges of a node, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the ID is not in this snapshot.
    pub fn edges_from(&self, id: NodeId) -> Result<Vec<&Edge>> {
        let idx = self.index_of(id)?;
        Ok(self.incident(idx, Direction::Outgoing))
    }

    /// Incoming edges of a node, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if the ID is not in this snapshot.
    pub fn edges_to(&self, id: NodeId) -> Result<Vec<&Edge>> {
        let idx = self.index_of(id)?;
        Ok(self.incident(idx, Direction::Incoming))
    }

    /// petgraph walks adjacency newest-first; sort by index to restore input order.
    fn incident(&self, idx: NodeIndex, direction: Direction) -> Vec<&Edge> {
        let mut ids: Vec<EdgeIndex> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| e.id())
            .collect();
        ids.sort_unstable();
        ids.into_iter().map(|e| &self.graph[e]).collect()
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.graph[self.root]
    }

    /// Whether `id` is the root of this snapshot.
    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        self.graph[self.root].id == id
    }

    /// All nodes in input order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> + '_ {
        self.graph.raw_nodes().iter().map(|n| &n.weight)
    }

    /// All edges in input order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = &Edge> + '_ {
        self.graph.raw_edges().iter().map(|e| &e.weight)
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Records dropped while this snapshot was built.
    #[must_use]
    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    /// Whether an edge is effectively hidden (either endpoint hidden).
    #[must_use]
    pub fn is_edge_hidden(&self, edge: &Edge) -> bool {
        self.hidden(edge.from) || self.hidden(edge.to)
    }

    /// Hidden flag of a node; unknown IDs count as hidden.
    fn hidden(&self, id: NodeId) -> bool {
        self.lookup_node(id).map_or(true, |n| n.hidden)
    }

    /// Whether the directed graph contains a cycle (self-loops included).
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        algo::is_cyclic_directed(&self.graph)
    }

    /// Number of weakly connected components.
    ///
    /// A well-formed snapshot is a single component grown from the root.
    #[must_use]
    pub fn component_count(&self) -> usize {
        algo::connected_components(&self.graph)
    }

    /// Produce a new snapshot with `hidden` set on every node in `ids`.
    ///
    /// The root is never hidden. Unknown IDs are ignored.
    #[must_use]
    pub fn with_hidden(&self, ids: &HashSet<NodeId>, hidden: bool) -> Self {
        self.map_nodes(|node| {
            if ids.contains(&node.id) && !(hidden && node.is_root) {
                node.hidden = hidden;
            }
        })
    }

    /// Produce a new snapshot with every node's `hidden` flag recomputed.
    #[must_use]
    pub fn with_visibility(&self, mut hidden: impl FnMut(&Node) -> bool) -> Self {
        self.map_nodes(|node| {
            node.hidden = !node.is_root && hidden(node);
        })
    }

    fn map_nodes(&self, mut f: impl FnMut(&mut Node)) -> Self {
        let mut next = self.clone();
        for node in next.graph.node_weights_mut() {
            f(node);
        }
        next
    }

    /// Prepend problems found while decoding the input, ahead of the
    /// warnings raised by the build itself.
    pub(crate) fn with_load_warnings(mut self, mut load: Vec<GraphWarning>) -> Self {
        load.append(&mut self.warnings);
        self.warnings = load;
        self
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Result<NodeIndex> {
        self.index.get(&id).copied().ok_or(Error::NodeNotFound(id))
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    pub(crate) fn edge_at(&self, idx: EdgeIndex) -> &Edge {
        &self.graph[idx]
    }

    /// Outgoing edge indices of a node, in input order.
    pub(crate) fn outgoing(&self, idx: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
        let mut out: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        out.sort_unstable_by_key(|&(e, _)| e);
        out
    }
}
