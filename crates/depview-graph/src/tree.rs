//! Tree projection of a snapshot.
//!
//! [`project`] turns the flat node/edge lists into a single-rooted hierarchy
//! for the tree presentation, clustering each node's children under one
//! synthetic row per [`NodeGroup`].
//!
//! # Parent Assignment
//!
//! Edges are read in snapshot order and the first edge reaching a node makes
//! its source the parent. A node with several incoming edges is therefore
//! placed by whichever edge the data source listed first; reordering the
//! input can move it. Because every node gets at most one parent the result
//! is a strict tree even when the graph has cycles. Self-loops never assign a
//! parent.

use crate::domain::{Node, NodeGroup, NodeId};
use crate::error::{Error, Result};
use crate::model::GraphModel;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// What a tree row stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TreeEntry {
    /// A graph node.
    Node {
        /// The wrapped node
        #[serde(flatten)]
        node: Node,
    },
    /// A synthetic row clustering siblings of one group.
    Group {
        /// The shared group tag
        group: NodeGroup,
    },
}

/// A row of the projected tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    /// Stable row key: the node ID, or `"{parent}-{GROUP}"` for group rows.
    pub key: String,

    /// Row text: the node label, or the group tag.
    pub title: String,

    /// What this row stands for.
    pub entry: TreeEntry,

    /// Child rows.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// The wrapped graph node, if this is not a group row.
    #[must_use]
    pub fn node(&self) -> Option<&Node> {
        match &self.entry {
            TreeEntry::Node { node } => Some(node),
            TreeEntry::Group { .. } => None,
        }
    }

    /// The row's group tag.
    #[must_use]
    pub fn group(&self) -> NodeGroup {
        match &self.entry {
            TreeEntry::Node { node } => node.group,
            TreeEntry::Group { group } => *group,
        }
    }

    /// Whether this is a synthetic group row.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.entry, TreeEntry::Group { .. })
    }

    /// Graph nodes in this subtree, depth-first.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(row) = stack.pop() {
            if let Some(node) = row.node() {
                out.push(node.id);
            }
            stack.extend(row.children.iter().rev());
        }
        out
    }
}

/// Project `graph` into a single-rooted tree.
///
/// Every node of the snapshot ends up in the tree exactly once.
///
/// # Errors
///
/// Returns [`Error::MalformedGraph`] when zero or several nodes end up
/// without a parent, and [`Error::DetachedNodes`] when the single parentless
/// node does not reach every node (a cycle hanging apart from it).
pub fn project(graph: &GraphModel) -> Result<TreeNode> {
    let mut parent: HashMap<NodeId, NodeId> = HashMap::with_capacity(graph.node_count());
    let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    let mut placed: HashSet<NodeId> = HashSet::with_capacity(graph.node_count());

    for edge in graph.edges() {
        if edge.is_self_loop() {
            continue;
        }
        parent.entry(edge.to).or_insert(edge.from);
        if placed.insert(edge.to) {
            children.entry(edge.from).or_default().push(edge.to);
        }
    }

    let parentless: Vec<NodeId> = graph
        .nodes()
        .map(|n| n.id)
        .filter(|id| !parent.contains_key(id))
        .collect();
    if parentless.len() != 1 {
        tracing::warn!(?parentless, "Cannot project tree without a unique root");
        return Err(Error::MalformedGraph { parentless });
    }
    let root = parentless[0];

    // Pre-order listing from the root; building in reverse guarantees every
    // child row exists before its parent is assembled.
    let mut order = Vec::with_capacity(graph.node_count());
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        order.push(id);
        if let Some(kids) = children.get(&id) {
            stack.extend(kids.iter().rev());
        }
    }

    if order.len() < graph.node_count() {
        let reached: HashSet<NodeId> = order.iter().copied().collect();
        let detached: Vec<NodeId> = graph
            .nodes()
            .map(|n| n.id)
            .filter(|id| !reached.contains(id))
            .collect();
        tracing::warn!(%root, ?detached, "Nodes unreachable from the tree root");
        return Err(Error::DetachedNodes { root, detached });
    }

    let mut built: HashMap<NodeId, TreeNode> = HashMap::with_capacity(order.len());
    for &id in order.iter().rev() {
        let node = graph.lookup_node(id)?;
        let kids: Vec<TreeNode> = children
            .get(&id)
            .map(|ids| ids.iter().filter_map(|k| built.remove(k)).collect())
            .unwrap_or_default();

        built.insert(
            id,
            TreeNode {
                key: id.to_string(),
                title: node.label.clone(),
                entry: TreeEntry::Node { node: node.clone() },
                children: group_children(id, kids),
            },
        );
    }

    let tree = built.remove(&root).ok_or(Error::NodeNotFound(root))?;
    tracing::debug!(root = %root, rows = order.len(), "Projected tree");
    Ok(tree)
}

/// Replace a child list with one row per distinct group, groups sorted by tag.
fn group_children(parent: NodeId, children: Vec<TreeNode>) -> Vec<TreeNode> {
    if children.is_empty() {
        return children;
    }

    let mut groups: Vec<NodeGroup> = children.iter().map(TreeNode::group).collect();
    groups.sort_by_key(|g| g.as_str());
    groups.dedup();

    let mut remaining = children;
    groups
        .into_iter()
        .map(|group| {
            let (members, rest): (Vec<TreeNode>, Vec<TreeNode>) =
                remaining.drain(..).partition(|c| c.group() == group);
            remaining = rest;
            TreeNode {
                key: format!("{parent}-{group}"),
                title: group.to_string(),
                entry: TreeEntry::Group { group },
                children: members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Edge;
    use crate::model::fixtures::{edge, node};

    fn titles(rows: &[TreeNode]) -> Vec<&str> {
        rows.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_scenario_groups_sorted() {
        let graph = GraphModel::new(
            vec![
                node(1, NodeGroup::Prog),
                node(2, NodeGroup::Func),
                node(3, NodeGroup::Tabl),
            ],
            vec![edge(1, 2), edge(1, 3)],
        )
        .unwrap();

        let tree = project(&graph).unwrap();

        assert_eq!(tree.key, "1");
        assert_eq!(titles(&tree.children), vec!["FUNC", "TABL"]);
        assert!(tree.children.iter().all(TreeNode::is_group));
        assert_eq!(tree.children[0].key, "1-FUNC");
        assert_eq!(tree.children[0].children.len(), 1);
        assert_eq!(tree.children[0].children[0].key, "2");
        assert_eq!(tree.children[1].children[0].key, "3");
    }

    #[test]
    fn test_shared_group_and_nested_child() {
        // A -> B, A -> C, B -> D with B and C both FUNC
        let graph = GraphModel::new(
            vec![
                node(1, NodeGroup::Prog),
                node(2, NodeGroup::Func),
                node(3, NodeGroup::Func),
                node(4, NodeGroup::Tabl),
            ],
            vec![edge(1, 2), edge(1, 3), edge(2, 4)],
        )
        .unwrap();

        let tree = project(&graph).unwrap();

        assert_eq!(titles(&tree.children), vec!["FUNC"]);
        let func = &tree.children[0];
        assert_eq!(titles(&func.children), vec!["N2", "N3"]);
        let b = &func.children[0];
        assert_eq!(titles(&b.children), vec!["TABL"]);
        assert_eq!(b.children[0].children[0].key, "4");
    }

    #[test]
    fn test_first_edge_wins_parent() {
        let nodes = vec![
            node(1, NodeGroup::Prog),
            node(2, NodeGroup::Func),
            node(3, NodeGroup::Func),
            node(4, NodeGroup::Tabl),
        ];
        let via_two = GraphModel::new(
            nodes.clone(),
            vec![edge(1, 2), edge(1, 3), edge(2, 4), edge(3, 4)],
        )
        .unwrap();
        let via_three =
            GraphModel::new(nodes, vec![edge(1, 2), edge(1, 3), edge(3, 4), edge(2, 4)]).unwrap();

        let first = project(&via_two).unwrap();
        let second = project(&via_three).unwrap();

        assert_eq!(first.children[0].children[0].children.len(), 1, "4 under 2");
        assert!(first.children[0].children[1].children.is_empty());
        assert!(second.children[0].children[0].children.is_empty());
        assert_eq!(second.children[0].children[1].children.len(), 1, "4 under 3");
    }

    #[test]
    fn test_every_node_appears_once_despite_cycle() {
        let graph = GraphModel::new(
            vec![
                node(1, NodeGroup::Prog),
                node(2, NodeGroup::Func),
                node(3, NodeGroup::Meth),
            ],
            vec![edge(1, 2), edge(2, 3), edge(3, 2), edge(3, 3)],
        )
        .unwrap();

        let tree = project(&graph).unwrap();
        let mut ids = tree.node_ids();
        ids.sort();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn test_no_parentless_node_is_malformed() {
        let graph = GraphModel::new(
            vec![node(1, NodeGroup::Prog), node(2, NodeGroup::Func)],
            vec![edge(1, 2), edge(2, 1)],
        )
        .unwrap();

        match project(&graph) {
            Err(Error::MalformedGraph { parentless }) => assert!(parentless.is_empty()),
            other => panic!("expected MalformedGraph, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_parentless_nodes_is_malformed() {
        let graph = GraphModel::new(
            vec![
                node(1, NodeGroup::Prog),
                node(2, NodeGroup::Func),
                node(3, NodeGroup::Tabl),
            ],
            vec![Edge::new(1, 2)],
        )
        .unwrap();

        match project(&graph) {
            Err(Error::MalformedGraph { parentless }) => {
                assert_eq!(parentless, vec![NodeId(1), NodeId(3)]);
            }
            other => panic!("expected MalformedGraph, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_detached_from_root_is_malformed() {
        let graph = GraphModel::new(
            vec![
                node(1, NodeGroup::Prog),
                node(2, NodeGroup::Func),
                node(3, NodeGroup::Tabl),
                node(4, NodeGroup::Dtel),
            ],
            vec![edge(1, 2), edge(3, 4), edge(4, 3)],
        )
        .unwrap();

        match project(&graph) {
            Err(Error::DetachedNodes { root, detached }) => {
                assert_eq!(root, NodeId(1));
                assert_eq!(detached, vec![NodeId(3), NodeId(4)]);
            }
            other => panic!("expected DetachedNodes, got {other:?}"),
        }
    }

    #[test]
    fn test_single_node_tree() {
        let graph = GraphModel::new(vec![node(1, NodeGroup::Prog)], vec![]).unwrap();
        let tree = project(&graph).unwrap();
        assert!(tree.children.is_empty());
        assert_eq!(tree.node().map(|n| n.id), Some(NodeId(1)));
    }
}
