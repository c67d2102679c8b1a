//! CLI value types for the `view` command's action replay.

use depview_graph::NodeId;
use std::fmt;
use std::str::FromStr;

/// One interaction on the network view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Hide or reveal everything below the node (double click)
    Toggle,
    /// Reveal the node's direct children
    Expand,
    /// Hide the node's direct children
    Collapse,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle => write!(f, "toggle"),
            Self::Expand => write!(f, "expand"),
            Self::Collapse => write!(f, "collapse"),
        }
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "toggle" => Ok(Self::Toggle),
            "expand" => Ok(Self::Expand),
            "collapse" => Ok(Self::Collapse),
            other => Err(format!(
                "Invalid action '{other}'. Valid actions: toggle, expand, collapse"
            )),
        }
    }
}

/// An action applied to a node, written `kind:ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewAction {
    /// What to do
    pub kind: ActionKind,
    /// Node the action targets
    pub node: NodeId,
}

impl fmt::Display for ViewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.node)
    }
}
