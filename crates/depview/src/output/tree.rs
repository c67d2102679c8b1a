//! Tree rendering for `depview tree` output.

use std::collections::HashSet;
use std::io::{self, Write};

use colored::Colorize;
use depview_graph::TreeNode;

use super::color::{bold, colorize_group, colorize_id, dimmed, node_marker};
use super::{OutputConfig, OutputMode, print_json};
use crate::config::DepviewConfig;

/// Print a projected tree with ASCII/Unicode connectors.
///
/// Renders a tree like:
/// ```text
/// ◆ 1 Billing
/// ├── FUNC
/// │   └── ○ 2 Read orders
/// └── TABL
///     └── ○ 3 Orders
/// ```
///
/// Rows whose key is in `highlight` are marked.
pub fn print_tree(
    root: &TreeNode,
    highlight: &[String],
    palette: &DepviewConfig,
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let config = OutputConfig::from_env();
            write_tree(&mut handle, root, highlight, palette, &config)
        }
        OutputMode::Json => print_json(&serde_json::json!({
            "tree": root,
            "matches": highlight,
        })),
    }
}

/// Render the tree as text.
pub(crate) fn write_tree<W: Write>(
    w: &mut W,
    root: &TreeNode,
    highlight: &[String],
    palette: &DepviewConfig,
    config: &OutputConfig,
) -> io::Result<()> {
    let highlight: HashSet<&str> = highlight.iter().map(String::as_str).collect();

    let root_icon = if config.use_ascii { "*" } else { "◆" };
    let root_icon_str = if config.use_colors {
        root_icon.cyan().bold().to_string()
    } else {
        root_icon.to_string()
    };
    writeln!(
        w,
        "{} {}",
        root_icon_str,
        row_text(root, &highlight, palette, config)
    )?;

    // Explicit stack of (row, continuation flags of its ancestors).
    let mut stack: Vec<(&TreeNode, Vec<bool>, bool)> = root
        .children
        .iter()
        .enumerate()
        .rev()
        .map(|(i, child)| (child, Vec::new(), i == root.children.len() - 1))
        .collect();

    let (branch, corner, pipe, space) = if config.use_ascii {
        ("|-- ", "`-- ", "|   ", "    ")
    } else {
        ("├── ", "└── ", "│   ", "    ")
    };

    while let Some((row, prefix_segments, is_last)) = stack.pop() {
        let mut prefix = String::new();
        for &has_more in &prefix_segments {
            prefix.push_str(&dimmed(if has_more { pipe } else { space }, config));
        }
        let connector = dimmed(if is_last { corner } else { branch }, config);

        writeln!(
            w,
            "{}{}{}",
            prefix,
            connector,
            row_text(row, &highlight, palette, config)
        )?;

        let mut segments = prefix_segments;
        segments.push(!is_last);
        let count = row.children.len();
        for (i, child) in row.children.iter().enumerate().rev() {
            stack.push((child, segments.clone(), i == count - 1));
        }
    }

    Ok(())
}

fn row_text(
    row: &TreeNode,
    highlight: &HashSet<&str>,
    palette: &DepviewConfig,
    config: &OutputConfig,
) -> String {
    let text = match row.node() {
        Some(node) => {
            let label = if node.hidden {
                dimmed(&node.label, config)
            } else {
                node.label.clone()
            };
            format!(
                "{} {} {}",
                node_marker(node, config),
                colorize_id(node.id, config),
                label
            )
        }
        None => colorize_group(row.group(), palette.color(row.group()), config),
    };

    if !highlight.contains(row.key.as_str()) {
        return text;
    }
    let mark = if config.use_ascii { "<" } else { "◀" };
    format!("{text} {}", bold(mark, config))
}
