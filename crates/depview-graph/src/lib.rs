//! Depview graph engine.
//!
//! Pure, synchronous operations over immutable snapshots of an object
//! dependency graph: reachability walks, subtree show/hide, tree projection,
//! lookup and relationship export. Rendering, persistence and the query
//! source are left to the caller.
//!
//! # Example
//!
//! ```
//! use depview_graph::{Edge, GraphModel, Node, NodeGroup, NodeId, traverse, TraverseOptions};
//!
//! let graph = GraphModel::new(
//!     vec![
//!         Node::new(1, NodeGroup::Prog, "Billing", "ZBILLING"),
//!         Node::new(2, NodeGroup::Tabl, "Orders", "ZORDERS"),
//!     ],
//!     vec![Edge::new(1, 2)],
//! )?;
//!
//! let reached = traverse(&graph, NodeId(1), TraverseOptions::default())?;
//! assert_eq!(reached.node_ids(), vec![NodeId(1), NodeId(2)]);
//! # Ok::<(), depview_graph::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod domain;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod search;
pub mod stats;
pub mod traversal;
pub mod tree;
pub mod visibility;

pub use domain::{Edge, EdgeId, Node, NodeGroup, NodeId};
pub use error::{Error, GraphWarning, Result};
pub use export::{ExportArtifact, RelationshipRecord};
pub use model::GraphModel;
pub use stats::{GraphStats, LegendEntry, NodeSummary};
pub use traversal::{Reachable, TraverseOptions, traverse, visible};
pub use tree::{TreeEntry, TreeNode, project};
pub use visibility::{CollapsedRoots, VisibilityUpdate};
