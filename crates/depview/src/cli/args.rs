//! CLI argument structs for all commands.
//!
//! Every command reads one snapshot file, given as the first positional
//! argument.

use clap::Parser;
use depview_graph::{NodeGroup, NodeId};
use std::path::PathBuf;

use super::types::ViewAction;
use super::validators::{
    validate_delimiter, validate_group, validate_node_id, validate_view_action,
};

/// Arguments for the `info` command
#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {
    /// Snapshot file (.json or .jsonl)
    pub snapshot: PathBuf,
}

/// Arguments for the `traverse` command
#[derive(Parser, Debug, Clone)]
pub struct TraverseArgs {
    /// Snapshot file (.json or .jsonl)
    pub snapshot: PathBuf,

    /// Node to start from
    #[arg(value_parser = validate_node_id)]
    pub node_id: NodeId,

    /// Leave the start node out of the result
    #[arg(long)]
    pub exclude_self: bool,

    /// Only follow the start node's own outgoing edges
    #[arg(long)]
    pub direct: bool,

    /// Walk through hidden nodes as well
    #[arg(long)]
    pub include_hidden: bool,
}

/// Arguments for the `tree` command
#[derive(Parser, Debug, Clone)]
pub struct TreeArgs {
    /// Snapshot file (.json or .jsonl)
    pub snapshot: PathBuf,

    /// Highlight rows whose title contains this text
    #[arg(short, long)]
    pub search: Option<String>,
}

/// Arguments for the `search` command
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Snapshot file (.json or .jsonl)
    pub snapshot: PathBuf,

    /// Text to look for in labels and technical names
    pub query: String,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Snapshot file (.json or .jsonl)
    pub snapshot: PathBuf,

    /// Node to display
    #[arg(value_parser = validate_node_id)]
    pub node_id: NodeId,
}

/// Arguments for the `view` command
#[derive(Parser, Debug, Clone)]
pub struct ViewArgs {
    /// Snapshot file (.json or .jsonl)
    pub snapshot: PathBuf,

    /// Actions to replay in order, written kind:ID
    ///
    /// Kinds: toggle (hide or reveal the whole subtree), expand and
    /// collapse (direct children only).
    #[arg(short, long = "action", value_parser = validate_view_action)]
    pub actions: Vec<ViewAction>,

    /// Start from the loaded flags instead of the initial reveal state
    /// (everything but the root hidden)
    #[arg(long)]
    pub no_reset: bool,

    /// Additionally hide every node of this group
    #[arg(long = "hide-group", value_parser = validate_group)]
    pub hide_groups: Vec<NodeGroup>,
}

/// Arguments for the `export` command
#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// Snapshot file (.json or .jsonl)
    pub snapshot: PathBuf,

    /// Export the subtree of this node instead of the whole visible view
    #[arg(long, value_parser = validate_node_id)]
    pub from: Option<NodeId>,

    /// Output file (defaults to the configured artifact name in the current
    /// directory; `-` writes to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Field delimiter (overrides the configuration)
    #[arg(short, long, value_parser = validate_delimiter)]
    pub delimiter: Option<char>,
}
