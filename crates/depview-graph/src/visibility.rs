//! Subtree show/hide interactions.
//!
//! Visibility state is an explicit value: the snapshot's per-node `hidden`
//! flags plus the set of [`CollapsedRoots`]. Every operation takes both as
//! input and returns replacements; neither is modified in place.
//!
//! # Toggle Semantics
//!
//! [`toggle_descendants`] flips the node's membership in the collapsed set,
//! then recomputes the flags of its whole subtree (hidden nodes included)
//! from the new set: a node is hidden when some collapsed root other than
//! itself reaches it. Flags outside the subtree are untouched, so applying
//! the same toggle twice restores both the set and the flags, and a subtree
//! still owned by another collapsed root stays hidden.
//!
//! [`toggle_direct_children`] and [`hide_groups`] write flags directly
//! without consulting the set.
//!
//! The snapshot root is pinned: no operation here ever hides it.

use crate::domain::{NodeGroup, NodeId};
use crate::error::Result;
use crate::model::GraphModel;
use crate::traversal::{TraverseOptions, traverse};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Node IDs whose descendant subtree is currently toggled hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CollapsedRoots(BTreeSet<NodeId>);

impl CollapsedRoots {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is a collapsed root.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }

    /// Symmetric difference with `{id}`.
    #[must_use]
    pub fn toggled(&self, id: NodeId) -> Self {
        let mut next = self.0.clone();
        if !next.remove(&id) {
            next.insert(id);
        }
        Self(next)
    }

    /// Collapsed roots in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }

    /// Number of collapsed roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no subtree is collapsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<NodeId> for CollapsedRoots {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of a visibility operation.
#[derive(Debug, Clone)]
pub struct VisibilityUpdate {
    /// The new snapshot.
    pub graph: GraphModel,

    /// The new collapsed-roots set.
    pub collapsed: CollapsedRoots,

    /// Nodes whose flag was recomputed, in traversal order.
    pub affected: Vec<NodeId>,

    /// Whether the toggled node joined the collapsed set.
    pub collapsing: bool,
}

/// Flags derived from `collapsed` alone: every node reached from a collapsed
/// root other than itself is hidden, everything else visible.
///
/// Collapsed roots that are not in the snapshot are ignored.
#[must_use]
pub fn from_collapsed(graph: &GraphModel, collapsed: &CollapsedRoots) -> GraphModel {
    let owned = owned_nodes(graph, collapsed);
    graph.with_visibility(|node| owned.contains(&node.id))
}

/// The state of a freshly loaded result: the root is the only collapsed
/// root, so everything it reaches is hidden and toggling it reveals the
/// graph.
#[must_use]
pub fn reset(graph: &GraphModel) -> (GraphModel, CollapsedRoots) {
    let root = graph.root().id;
    let collapsed: CollapsedRoots = std::iter::once(root).collect();
    let next = from_collapsed(graph, &collapsed);
    tracing::debug!(%root, nodes = next.node_count(), "Reset visibility");
    (next, collapsed)
}

/// Flip the membership of `id` in `collapsed` and recompute the flags of
/// everything reachable from it.
///
/// # Errors
///
/// Returns [`crate::Error::NodeNotFound`] if `id` is not in the snapshot.
pub fn toggle_descendants(
    graph: &GraphModel,
    id: NodeId,
    collapsed: &CollapsedRoots,
) -> Result<VisibilityUpdate> {
    let subtree = TraverseOptions::descendants().through_hidden(true);
    let affected = affected_nodes(graph, id, subtree)?;
    let next = collapsed.toggled(id);
    let collapsing = next.contains(id);

    let owned = owned_nodes(graph, &next);
    let scope: HashSet<NodeId> = affected.iter().copied().collect();
    let updated = graph.with_visibility(|node| {
        if scope.contains(&node.id) {
            owned.contains(&node.id)
        } else {
            node.hidden
        }
    });

    tracing::debug!(
        node = %id,
        collapsing,
        affected = affected.len(),
        "Toggled descendants"
    );

    Ok(VisibilityUpdate {
        graph: updated,
        collapsed: next,
        affected,
        collapsing,
    })
}

/// Show (`expand = true`) or hide the direct children of `id`.
///
/// The collapsed-roots set is not consulted or changed.
///
/// # Errors
///
/// Returns [`crate::Error::NodeNotFound`] if `id` is not in the snapshot.
pub fn toggle_direct_children(
    graph: &GraphModel,
    id: NodeId,
    expand: bool,
) -> Result<(GraphModel, Vec<NodeId>)> {
    let options = TraverseOptions::direct_children().through_hidden(expand);
    let affected = affected_nodes(graph, id, options)?;

    tracing::debug!(node = %id, expand, affected = affected.len(), "Toggled direct children");

    Ok((apply(graph, &affected, !expand), affected))
}

/// Which way the "direct children" control should act on `id`.
///
/// Returns `None` when the node has no outgoing targets other than itself,
/// `Some(true)` when every direct target is hidden (so the next action should
/// expand), and `Some(false)` otherwise.
///
/// # Errors
///
/// Returns [`crate::Error::NodeNotFound`] if `id` is not in the snapshot.
pub fn direct_children_hidden(graph: &GraphModel, id: NodeId) -> Result<Option<bool>> {
    let mut targets = graph
        .edges_from(id)?
        .into_iter()
        .filter(|e| !e.is_self_loop())
        .map(|e| graph.lookup_node(e.to))
        .peekable();

    if targets.peek().is_none() {
        return Ok(None);
    }
    let mut all_hidden = true;
    for target in targets {
        all_hidden &= target?.hidden;
    }
    Ok(Some(all_hidden))
}

/// Hide every node belonging to one of `groups` (the legend filter).
///
/// Nodes outside those groups keep their flags. The root stays visible.
#[must_use]
pub fn hide_groups(graph: &GraphModel, groups: &BTreeSet<NodeGroup>) -> GraphModel {
    if groups.is_empty() {
        return graph.clone();
    }
    graph.with_visibility(|node| node.hidden || groups.contains(&node.group))
}

/// Union of the subtrees owned by each collapsed root, walking through
/// hidden nodes. A root only owns itself when another root reaches it.
fn owned_nodes(graph: &GraphModel, collapsed: &CollapsedRoots) -> HashSet<NodeId> {
    let options = TraverseOptions::descendants().through_hidden(true);
    collapsed
        .iter()
        .filter(|&id| graph.contains(id))
        .filter_map(|id| traverse(graph, id, options).ok())
        .flat_map(|reach| reach.node_ids())
        .collect()
}

fn affected_nodes(graph: &GraphModel, id: NodeId, options: TraverseOptions) -> Result<Vec<NodeId>> {
    let root = graph.root().id;
    let reach = traverse(graph, id, options)?;
    Ok(reach
        .nodes
        .iter()
        .map(|n| n.id)
        .filter(|&n| n != root)
        .collect())
}

fn apply(graph: &GraphModel, affected: &[NodeId], hidden: bool) -> GraphModel {
    let ids: HashSet<NodeId> = affected.iter().copied().collect();
    graph.with_hidden(&ids, hidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Node;
    use crate::error::Error;
    use crate::model::fixtures::{edge, node};
    use rstest::{fixture, rstest};

    fn hidden_ids(graph: &GraphModel) -> Vec<u64> {
        graph.nodes().filter(|n| n.hidden).map(|n| n.id.0).collect()
    }

    /// 1 -> 2 -> 4, 1 -> 3, 4 -> 1 (cycle back to root)
    #[fixture]
    fn graph() -> GraphModel {
        GraphModel::new(
            vec![
                node(1, NodeGroup::Prog),
                node(2, NodeGroup::Func),
                node(3, NodeGroup::Tabl),
                node(4, NodeGroup::Tabl),
            ],
            vec![edge(1, 2), edge(1, 3), edge(2, 4), edge(4, 1)],
        )
        .unwrap()
    }

    #[test]
    fn test_collapsed_roots_toggle_is_xor() {
        let set = CollapsedRoots::new().toggled(NodeId(3));
        assert!(set.contains(NodeId(3)));
        let set = set.toggled(NodeId(5)).toggled(NodeId(3));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![NodeId(5)]);
        assert_eq!(set.len(), 1);
    }

    #[rstest]
    fn test_reset_hides_all_but_root(graph: GraphModel) {
        let (reset_graph, collapsed) = reset(&graph);

        assert_eq!(hidden_ids(&reset_graph), vec![2, 3, 4]);
        assert!(collapsed.contains(NodeId(1)));
        assert_eq!(collapsed.len(), 1);
    }

    #[rstest]
    fn test_toggle_root_after_reset_reveals_everything(graph: GraphModel) {
        let (reset_graph, collapsed) = reset(&graph);

        let update = toggle_descendants(&reset_graph, NodeId(1), &collapsed).unwrap();

        assert!(!update.collapsing);
        assert!(hidden_ids(&update.graph).is_empty());
        assert!(update.collapsed.is_empty());
        assert_eq!(update.affected, vec![NodeId(2), NodeId(4), NodeId(3)]);
    }

    #[rstest]
    fn test_collapse_never_hides_root(graph: GraphModel) {
        let update = toggle_descendants(&graph, NodeId(2), &CollapsedRoots::new()).unwrap();

        assert!(update.collapsing);
        assert_eq!(hidden_ids(&update.graph), vec![4]);
        assert!(update.collapsed.contains(NodeId(2)));
        assert!(!update.graph.root().hidden);
    }

    #[rstest]
    fn test_toggle_twice_restores_state(graph: GraphModel) {
        let collapsed = CollapsedRoots::new();
        let once = toggle_descendants(&graph, NodeId(1), &collapsed).unwrap();
        assert_eq!(hidden_ids(&once.graph), vec![2, 3, 4]);

        let twice = toggle_descendants(&once.graph, NodeId(1), &once.collapsed).unwrap();
        assert!(hidden_ids(&twice.graph).is_empty());
        assert_eq!(twice.collapsed, collapsed);
    }

    /// 1 -> 2 -> 4, 1 -> 3 (no cycle)
    #[fixture]
    fn chain() -> GraphModel {
        GraphModel::new(
            vec![
                node(1, NodeGroup::Prog),
                node(2, NodeGroup::Func),
                node(3, NodeGroup::Tabl),
                node(4, NodeGroup::Tabl),
            ],
            vec![edge(1, 2), edge(2, 4), edge(1, 3)],
        )
        .unwrap()
    }

    #[rstest]
    fn test_reopening_parent_keeps_nested_collapse(chain: GraphModel) {
        let inner = toggle_descendants(&chain, NodeId(2), &CollapsedRoots::new()).unwrap();
        assert_eq!(hidden_ids(&inner.graph), vec![4]);

        let outer = toggle_descendants(&inner.graph, NodeId(1), &inner.collapsed).unwrap();
        assert_eq!(hidden_ids(&outer.graph), vec![2, 3, 4]);

        let reopened = toggle_descendants(&outer.graph, NodeId(1), &outer.collapsed).unwrap();
        assert_eq!(hidden_ids(&reopened.graph), vec![4], "2 still owns 4");
        assert_eq!(reopened.collapsed, inner.collapsed);
    }

    #[rstest]
    fn test_toggling_hidden_node_twice_after_reset(chain: GraphModel) {
        let (start, collapsed) = reset(&chain);

        let once = toggle_descendants(&start, NodeId(2), &collapsed).unwrap();
        assert_eq!(hidden_ids(&once.graph), vec![2, 3, 4]);

        let twice = toggle_descendants(&once.graph, NodeId(2), &once.collapsed).unwrap();
        assert_eq!(hidden_ids(&twice.graph), vec![2, 3, 4]);
        assert_eq!(twice.collapsed, collapsed);
    }

    #[rstest]
    fn test_from_collapsed_ignores_unknown_roots(chain: GraphModel) {
        let collapsed: CollapsedRoots = [NodeId(2), NodeId(42)].into_iter().collect();
        assert_eq!(hidden_ids(&from_collapsed(&chain, &collapsed)), vec![4]);
    }

    #[rstest]
    fn test_toggle_does_not_touch_input(graph: GraphModel) {
        let _ = toggle_descendants(&graph, NodeId(1), &CollapsedRoots::new()).unwrap();
        assert!(hidden_ids(&graph).is_empty());
    }

    #[rstest]
    fn test_direct_children_expand_and_collapse(graph: GraphModel) {
        let (reset_graph, _) = reset(&graph);

        let (expanded, affected) = toggle_direct_children(&reset_graph, NodeId(1), true).unwrap();
        assert_eq!(affected, vec![NodeId(2), NodeId(3)]);
        assert_eq!(hidden_ids(&expanded), vec![4]);

        let (collapsed, _) = toggle_direct_children(&expanded, NodeId(1), false).unwrap();
        assert_eq!(hidden_ids(&collapsed), vec![2, 3, 4]);
    }

    #[rstest]
    fn test_direct_children_hidden_hint(graph: GraphModel) {
        let (reset_graph, _) = reset(&graph);
        assert_eq!(direct_children_hidden(&reset_graph, NodeId(1)).unwrap(), Some(true));
        assert_eq!(direct_children_hidden(&graph, NodeId(1)).unwrap(), Some(false));
        assert_eq!(direct_children_hidden(&graph, NodeId(3)).unwrap(), None);
    }

    #[test]
    fn test_self_loop_only_node_has_no_children() {
        let graph = GraphModel::new(
            vec![node(1, NodeGroup::Prog), node(2, NodeGroup::Func)],
            vec![edge(1, 2), edge(2, 2)],
        )
        .unwrap();
        assert_eq!(direct_children_hidden(&graph, NodeId(2)).unwrap(), None);
    }

    #[rstest]
    #[case::toggle(true)]
    #[case::direct(false)]
    fn test_unknown_node_is_not_found(graph: GraphModel, #[case] descendants: bool) {
        let result = if descendants {
            toggle_descendants(&graph, NodeId(99), &CollapsedRoots::new()).map(|_| ())
        } else {
            toggle_direct_children(&graph, NodeId(99), true).map(|_| ())
        };
        assert!(matches!(result, Err(Error::NodeNotFound(NodeId(99)))));
    }

    #[rstest]
    fn test_hide_groups(graph: GraphModel) {
        let groups: BTreeSet<NodeGroup> = [NodeGroup::Tabl, NodeGroup::Prog].into_iter().collect();
        let filtered = hide_groups(&graph, &groups);

        assert_eq!(hidden_ids(&filtered), vec![3, 4], "root stays visible");
        let unchanged = hide_groups(&graph, &BTreeSet::new());
        assert!(hidden_ids(&unchanged).is_empty());
    }

    #[test]
    fn test_hide_groups_keeps_existing_hidden_flags() {
        let mut hidden = node(2, NodeGroup::Func);
        hidden.hidden = true;
        let nodes: Vec<Node> = vec![node(1, NodeGroup::Prog), hidden, node(3, NodeGroup::View)];
        let graph = GraphModel::new(nodes, vec![edge(1, 2), edge(1, 3)]).unwrap();

        let groups = [NodeGroup::View].into_iter().collect();
        assert_eq!(hidden_ids(&hide_groups(&graph, &groups)), vec![2, 3]);
    }
}
