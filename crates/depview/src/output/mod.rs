//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in both
//! human-readable text format and JSON format for programmatic use.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers (semantic colors, group palette)
//! - [`tree`]: Tree rendering with ASCII/Unicode connectors

pub mod color;
pub mod tree;

use depview_graph::{
    CollapsedRoots, Edge, GraphStats, LegendEntry, Node, NodeId, NodeSummary, Reachable,
};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{success, warning};
pub use tree::print_tree;

use color::{bold, colorize_group, colorize_id, dimmed, node_marker};

use crate::config::DepviewConfig;

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 80;

/// Configuration for output formatting.
///
/// This struct holds settings that control how output is formatted,
/// including terminal width limits, ASCII fallback mode, and color output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `DEPVIEW_MAX_WIDTH`: Maximum content width (default: 80)
    /// - `DEPVIEW_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `DEPVIEW_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let max_width = match env::var("DEPVIEW_MAX_WIDTH") {
            Ok(s) if !s.is_empty() => s.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    env_var = "DEPVIEW_MAX_WIDTH",
                    value = %s,
                    default = DEFAULT_MAX_CONTENT_WIDTH,
                    "Invalid value, using default"
                );
                DEFAULT_MAX_CONTENT_WIDTH
            }),
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match env::var("DEPVIEW_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "DEPVIEW_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // NO_COLOR (https://no-color.org/) wins over DEPVIEW_COLOR
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("DEPVIEW_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map_or(usize::from(DEFAULT_TERMINAL_WIDTH), |(w, _)| usize::from(w.0))
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    textwrap::wrap(text, width.max(20))
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Report Types
// ============================================================================

/// Everything `depview info` reports about a snapshot.
#[derive(Debug, Serialize)]
pub struct InfoReport<'a> {
    /// Snapshot file
    pub source: String,
    /// Designated root
    pub root: &'a Node,
    /// Visible counts
    pub stats: GraphStats,
    /// Groups present, with colors
    pub legend: Vec<LegendEntry>,
    /// Whether the graph contains a directed cycle
    pub has_cycle: bool,
    /// Weakly connected components
    pub components: usize,
    /// Load warnings, rendered
    pub warnings: Vec<String>,
}

/// One node with its neighbourhood, for `show` and `search`.
#[derive(Debug, Serialize)]
pub struct NodeDetails<'a> {
    /// The node
    pub node: &'a Node,
    /// Network-view label
    pub display_label: String,
    /// Inbound/outbound neighbour counts
    pub summary: NodeSummary,
    /// Whether every direct child is hidden; absent for leaves
    pub children_hidden: Option<bool>,
    /// Outgoing edges in snapshot order
    pub outgoing: Vec<&'a Edge>,
    /// Incoming edges in snapshot order
    pub incoming: Vec<&'a Edge>,
}

/// State after replaying `view` actions.
#[derive(Debug, Serialize)]
pub struct ViewReport<'a> {
    /// Collapsed roots after the last action
    pub collapsed: &'a CollapsedRoots,
    /// Visible counts
    pub stats: GraphStats,
    /// Visible nodes
    pub nodes: Vec<&'a Node>,
    /// Visible edges
    pub edges: Vec<&'a Edge>,
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print snapshot information in the specified format
pub fn print_info(report: &InfoReport<'_>, palette: &DepviewConfig, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_info(&mut handle, report, palette, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(report),
    }
}

/// Print a traversal result in the specified format
pub fn print_reachable(start: NodeId, reach: &Reachable<'_>, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_reachable(&mut handle, start, reach, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(&serde_json::json!({
            "start": start,
            "nodes": reach.nodes,
            "edges": reach.edges,
        })),
    }
}

/// Print node details in the specified format
pub fn print_node_details(details: &NodeDetails<'_>, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            let config = OutputConfig::from_env();
            write_node_details(&mut handle, details, &config, get_terminal_width())
        }
        OutputMode::Json => print_json(details),
    }
}

/// Print the visible view in the specified format
pub fn print_view(report: &ViewReport<'_>, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_view(&mut handle, report, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(report),
    }
}

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{msg}")
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(handle, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn node_line(node: &Node, config: &OutputConfig) -> String {
    let label = if node.hidden {
        dimmed(&node.label, config)
    } else {
        node.label.clone()
    };
    format!(
        "{} {:>6} {} {} {}",
        node_marker(node, config),
        colorize_id(node.id, config),
        node.group,
        label,
        dimmed(&format!("({})", node.technical_name), config)
    )
}

fn edge_line(edge: &Edge, config: &OutputConfig) -> String {
    let arrow = if config.use_ascii { "->" } else { "→" };
    let relation = edge
        .relation
        .as_deref()
        .map(|r| format!(" {}", dimmed(&format!("({r})"), config)))
        .unwrap_or_default();
    format!(
        "{} {} {}{}",
        colorize_id(edge.from, config),
        dimmed(arrow, config),
        colorize_id(edge.to, config),
        relation
    )
}

pub(crate) fn write_info<W: Write>(
    w: &mut W,
    report: &InfoReport<'_>,
    palette: &DepviewConfig,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", bold("Snapshot Information", config))?;
    writeln!(w, "====================")?;
    writeln!(w)?;
    writeln!(w, "{} {}", dimmed("Source:", config), report.source)?;
    writeln!(
        w,
        "{} {} {}",
        dimmed("Root:  ", config),
        colorize_id(report.root.id, config),
        report.root.label
    )?;
    writeln!(w)?;
    writeln!(
        w,
        "Nodes: {}  Edges: {}  Tables: {}  System objects: {}",
        report.stats.nodes, report.stats.edges, report.stats.tables, report.stats.system
    )?;
    writeln!(
        w,
        "Components: {}  Cycles: {}",
        report.components,
        if report.has_cycle { "yes" } else { "no" }
    )?;

    if !report.legend.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Legend", config))?;
        for entry in &report.legend {
            let color = entry
                .color
                .clone()
                .unwrap_or_else(|| palette.color(entry.group).to_string());
            writeln!(
                w,
                "  {} {}",
                colorize_group(entry.group, &color, config),
                dimmed(&color, config)
            )?;
        }
    }

    if !report.warnings.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{} ({}):",
            color::warning("Warnings", config),
            report.warnings.len()
        )?;
        for message in &report.warnings {
            writeln!(w, "  {message}")?;
        }
    }

    Ok(())
}

pub(crate) fn write_reachable<W: Write>(
    w: &mut W,
    start: NodeId,
    reach: &Reachable<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    if reach.is_empty() {
        writeln!(w, "Nothing reachable from {}.", colorize_id(start, config))?;
        return Ok(());
    }

    writeln!(
        w,
        "Reached {} node(s) and {} edge(s) from {}:",
        reach.nodes.len(),
        reach.edges.len(),
        colorize_id(start, config)
    )?;
    writeln!(w)?;
    for node in &reach.nodes {
        writeln!(w, "{}", node_line(node, config))?;
    }
    if !reach.edges.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Edges", config))?;
        for edge in &reach.edges {
            writeln!(w, "  {}", edge_line(edge, config))?;
        }
    }
    Ok(())
}

pub(crate) fn write_node_details<W: Write>(
    w: &mut W,
    details: &NodeDetails<'_>,
    config: &OutputConfig,
    terminal_width: usize,
) -> io::Result<()> {
    let node = details.node;
    let content_width = terminal_width.min(config.max_width);

    writeln!(
        w,
        "{} {}: {}",
        node_marker(node, config),
        colorize_id(node.id, config),
        node.label
    )?;
    writeln!(
        w,
        "{} {}    {} {}    {} {}",
        dimmed("Type:", config),
        node.group,
        dimmed("Name:", config),
        node.technical_name,
        dimmed("Custom:", config),
        if node.is_custom { "yes" } else { "no" }
    )?;
    if node.is_root || node.hidden {
        let flags: Vec<&str> = [(node.is_root, "root"), (node.hidden, "hidden")]
            .into_iter()
            .filter_map(|(set, name)| set.then_some(name))
            .collect();
        writeln!(w, "{} {}", dimmed("Flags:", config), flags.join(", "))?;
    }
    writeln!(
        w,
        "{} {} in, {} out",
        dimmed("Neighbours:", config),
        details.summary.inbound,
        details.summary.outbound
    )?;
    if let Some(all_hidden) = details.children_hidden {
        let hint = if all_hidden {
            "collapsed (expand to show direct children)"
        } else {
            "expanded"
        };
        writeln!(w, "{} {}", dimmed("Children:", config), hint)?;
    }

    if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Description", config))?;
        for line in wrap_text(description, content_width.saturating_sub(2)) {
            writeln!(w, "  {line}")?;
        }
    }

    for (title, edges) in [("Uses", &details.outgoing), ("Used by", &details.incoming)] {
        if edges.is_empty() {
            continue;
        }
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold(title, config), edges.len())?;
        for edge in edges.iter() {
            writeln!(w, "  {}", edge_line(edge, config))?;
        }
    }

    Ok(())
}

pub(crate) fn write_view<W: Write>(
    w: &mut W,
    report: &ViewReport<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "Visible: {} node(s), {} edge(s)",
        report.stats.nodes, report.stats.edges
    )?;
    let collapsed: Vec<String> = report
        .collapsed
        .iter()
        .map(|id| colorize_id(id, config))
        .collect();
    writeln!(
        w,
        "{} {}",
        dimmed("Collapsed:", config),
        if collapsed.is_empty() {
            "none".to_string()
        } else {
            collapsed.join(", ")
        }
    )?;
    writeln!(w)?;
    for node in &report.nodes {
        writeln!(w, "{}", node_line(node, config))?;
    }
    if !report.edges.is_empty() {
        writeln!(w)?;
        for edge in &report.edges {
            writeln!(w, "  {}", edge_line(edge, config))?;
        }
    }
    Ok(())
}
