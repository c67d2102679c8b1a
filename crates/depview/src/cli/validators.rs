//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use super::types::{ActionKind, ViewAction};
use depview_graph::{NodeGroup, NodeId};

/// Validate a node ID (a non-negative integer).
pub fn validate_node_id(s: &str) -> Result<NodeId, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Node ID cannot be empty".to_string());
    }

    s.parse::<u64>()
        .map(NodeId)
        .map_err(|_| format!("Invalid node ID '{s}'. Expected a non-negative integer"))
}

/// Validate a view action.
///
/// Format: `kind:ID` where kind is `toggle`, `expand` or `collapse`.
///
/// Examples: `toggle:1`, `expand:42`
pub fn validate_view_action(s: &str) -> Result<ViewAction, String> {
    let Some((kind, id)) = s.split_once(':') else {
        return Err(format!(
            "Invalid action format: '{s}'. Expected kind:ID (e.g., toggle:1)"
        ));
    };

    Ok(ViewAction {
        kind: kind.parse::<ActionKind>()?,
        node: validate_node_id(id)?,
    })
}

/// Validate a group tag such as `TABL` (case-insensitive).
pub fn validate_group(s: &str) -> Result<NodeGroup, String> {
    s.parse()
}

/// Validate an export delimiter: exactly one ASCII character that is not a
/// quote or line break.
pub fn validate_delimiter(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(format!(
            "Delimiter must be a single character, got '{s}'"
        ));
    };

    if !c.is_ascii() {
        return Err(format!("Delimiter must be an ASCII character, got '{c}'"));
    }

    if matches!(c, '"' | '\r' | '\n') {
        return Err("Delimiter cannot be a quote or line break".to_string());
    }

    Ok(c)
}
