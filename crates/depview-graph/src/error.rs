//! Error types for graph engine operations.
//!
//! Errors fall into two groups:
//!
//! - **`Error`**: conditions surfaced to the caller (unknown node, empty export,
//!   ambiguous tree root, unreadable input)
//! - **`GraphWarning`**: problems in externally supplied data that are
//!   dropped and recorded so a partial graph can still be shown
//!
//! Hidden nodes, cycles and self-loops are normal interaction states and never
//! produce either.

use crate::domain::{EdgeId, NodeId};
use std::fmt;
use thiserror::Error;

/// Result type for graph engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for graph engine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced node ID is absent from the snapshot
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// A search query matched no node
    #[error("cannot find matching node for '{query}'")]
    NoMatch {
        /// The query as entered
        query: String,
    },

    /// An edge references an endpoint that is not in the snapshot
    #[error("edge {edge} references missing node {missing}")]
    DanglingEdge {
        /// The offending edge
        edge: EdgeId,
        /// The endpoint that could not be resolved
        missing: NodeId,
    },

    /// Export requested with zero relationship records
    #[error("no data to export")]
    EmptyExport,

    /// Tree projection did not find exactly one parentless node
    #[error("malformed graph: expected exactly one parentless node, found {}", .parentless.len())]
    MalformedGraph {
        /// Every node that received no parent
        parentless: Vec<NodeId>,
    },

    /// The tree root does not reach every node of the snapshot
    #[error("malformed graph: {} node(s) unreachable from root {root}", .detached.len())]
    DetachedNodes {
        /// The single parentless node
        root: NodeId,
        /// Nodes the projection could not place, in snapshot order
        detached: Vec<NodeId>,
    },

    /// Export delimiter must be a single ASCII character other than a quote
    /// or line break
    #[error("invalid delimiter {0:?}")]
    InvalidDelimiter(char),

    /// Delimited text could not be written
    #[error("cannot write delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// A snapshot must contain at least one node
    #[error("graph snapshot contains no nodes")]
    EmptyGraph,

    /// Input could not be decoded
    #[error("invalid graph data{}: {source}", .line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Json {
        /// 1-based line for line-delimited input
        line: Option<usize>,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
    },

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for the not-found kind: an unknown node ID or a search
    /// without a match.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::NoMatch { .. })
    }

    /// Returns `true` for conditions meant to be shown to the user as a
    /// dismissable notice rather than a failure.
    #[must_use]
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::NoMatch { .. } | Self::EmptyExport)
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { line: None, source }
    }
}

/// A non-fatal problem found while building a snapshot.
///
/// The offending record is dropped and building continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphWarning {
    /// Edge endpoint does not resolve; the edge was dropped
    DanglingEdge {
        /// The dropped edge
        edge: EdgeId,
        /// The unresolved endpoint
        missing: NodeId,
    },

    /// A second node with an already-seen ID; the later one was dropped
    DuplicateNode(NodeId),

    /// A second edge with an already-seen ID; the later one was dropped
    DuplicateEdge(EdgeId),

    /// More than one node was flagged as root; the flag was cleared on this one
    ExtraRoot(NodeId),

    /// A line of line-delimited input could not be decoded and was skipped
    MalformedRecord {
        /// 1-based line number
        line: usize,
        /// Decoder message
        error: String,
    },
}

impl fmt::Display for GraphWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingEdge { edge, missing } => {
                write!(f, "dropped edge {edge}: node {missing} not in snapshot")
            }
            Self::DuplicateNode(id) => write!(f, "dropped duplicate node {id}"),
            Self::DuplicateEdge(id) => write!(f, "dropped duplicate edge {id}"),
            Self::ExtraRoot(id) => write!(f, "node {id} is not the root; flag cleared"),
            Self::MalformedRecord { line, error } => {
                write!(f, "line {line}: malformed record: {error}")
            }
        }
    }
}

impl GraphWarning {
    /// Convert into the equivalent hard error, for strict loading.
    #[must_use]
    pub fn into_error(self) -> Option<Error> {
        match self {
            Self::DanglingEdge { edge, missing } => Some(Error::DanglingEdge { edge, missing }),
            _ => None,
        }
    }
}
