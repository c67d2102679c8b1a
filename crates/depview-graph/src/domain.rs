//! Domain types for dependency graph snapshots.
//!
//! Nodes are code entities, dictionary objects and transformation steps
//! extracted from the graph database; edges are directed "uses"
//! relationships between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a node within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new node ID
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Unique identifier of an edge, conventionally `"{from}-{to}"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// Create a new edge ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the conventional ID for an edge between two nodes.
    #[must_use]
    pub fn between(from: NodeId, to: NodeId) -> Self {
        Self(format!("{from}-{to}"))
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Category tag of a graph entity.
///
/// The set is closed: styling and grouping switch on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeGroup {
    /// Program
    Prog,
    /// Function module
    Func,
    /// Class method
    Meth,
    /// Data element
    Dtel,
    /// Structure
    Stru,
    /// Type
    Type,
    /// Table type
    Ttyp,
    /// Database table
    Tabl,
    /// Transformation node
    Tran,
    /// Database view
    View,
}

impl NodeGroup {
    /// Every group, in declaration order.
    pub const ALL: [NodeGroup; 10] = [
        Self::Prog,
        Self::Func,
        Self::Meth,
        Self::Dtel,
        Self::Stru,
        Self::Type,
        Self::Ttyp,
        Self::Tabl,
        Self::Tran,
        Self::View,
    ];

    /// The upper-case tag used on the wire and in exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prog => "PROG",
            Self::Func => "FUNC",
            Self::Meth => "METH",
            Self::Dtel => "DTEL",
            Self::Stru => "STRU",
            Self::Type => "TYPE",
            Self::Ttyp => "TTYP",
            Self::Tabl => "TABL",
            Self::Tran => "TRAN",
            Self::View => "VIEW",
        }
    }
}

impl fmt::Display for NodeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Invalid node group '{}'. Valid groups: {}",
                    s,
                    Self::ALL.map(NodeGroup::as_str).join(", ")
                )
            })
    }
}

/// An entity in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,

    /// Display name
    pub label: String,

    /// Secondary identifying name (the object name in the source system)
    #[serde(default)]
    pub technical_name: String,

    /// Category tag
    pub group: NodeGroup,

    /// Optional free-text description
    #[serde(default, alias = "title", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// User-added object rather than a system-derived one
    #[serde(default)]
    pub is_custom: bool,

    /// Whether this node is the snapshot's root
    #[serde(default)]
    pub is_root: bool,

    /// View-state flag
    #[serde(default)]
    pub hidden: bool,
}

impl Node {
    /// Create a visible, non-root node.
    pub fn new(
        id: impl Into<NodeId>,
        group: NodeGroup,
        label: impl Into<String>,
        technical_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            technical_name: technical_name.into(),
            group,
            description: None,
            is_custom: false,
            is_root: false,
            hidden: false,
        }
    }

    /// Builder-style setter for the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style setter for the custom flag.
    #[must_use]
    pub fn custom(mut self) -> Self {
        self.is_custom = true;
        self
    }

    /// Label shown in the network view: the display name, followed by the
    /// description on its own line when there is one.
    #[must_use]
    pub fn display_label(&self) -> String {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => format!("{} \n {}", self.label, d),
            _ => self.label.clone(),
        }
    }
}

/// A directed relationship between two nodes.
///
/// Edges carry no `hidden` flag: an edge is hidden whenever either endpoint is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier
    pub id: EdgeId,

    /// Source node
    pub from: NodeId,

    /// Target node
    pub to: NodeId,

    /// Relationship label
    #[serde(
        rename = "type",
        alias = "label",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub relation: Option<String>,
}

impl Edge {
    /// Create an edge with the conventional `"{from}-{to}"` ID.
    pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        let from = from.into();
        let to = to.into();
        Self {
            id: EdgeId::between(from, to),
            from,
            to,
            relation: None,
        }
    }

    /// Builder-style setter for the relationship label.
    #[must_use]
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    /// Whether the edge points back at its own source.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}
