//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::Result;
use depview_graph::visibility::{self, CollapsedRoots};
use depview_graph::{
    GraphModel, GraphStats, NodeId, TraverseOptions, export, project, search, stats, traverse,
    visible,
};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::args::{ExportArgs, InfoArgs, SearchArgs, ShowArgs, TraverseArgs, TreeArgs, ViewArgs};
use super::types::ActionKind;
use crate::app::App;
use crate::output::{self, InfoReport, NodeDetails, OutputConfig, OutputMode, ViewReport};

/// Report a notice-level engine error (no match, nothing to export) without
/// failing the command.
fn print_notice(err: &depview_graph::Error, output_mode: OutputMode) -> Result<()> {
    tracing::debug!(error = %err, "Reporting notice");
    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({ "notice": err.to_string() }))?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            output::print_message(&output::warning(&err.to_string(), &config))?;
        }
    }
    Ok(())
}

fn node_details(graph: &GraphModel, id: NodeId) -> depview_graph::Result<NodeDetails<'_>> {
    let node = graph.lookup_node(id)?;
    Ok(NodeDetails {
        node,
        display_label: node.display_label(),
        summary: stats::inspect(graph, id)?,
        children_hidden: visibility::direct_children_hidden(graph, id)?,
        outgoing: graph.edges_from(id)?,
        incoming: graph.edges_to(id)?,
    })
}

/// Execute the info command
pub fn execute_info(app: &App, _args: &InfoArgs, output_mode: OutputMode) -> Result<()> {
    let graph = app.graph();

    let report = InfoReport {
        source: app.source().display().to_string(),
        root: graph.root(),
        stats: GraphStats::of(graph),
        legend: stats::legend(graph, &app.config().palette()),
        has_cycle: graph.has_cycle(),
        components: graph.component_count(),
        warnings: graph.warnings().iter().map(ToString::to_string).collect(),
    };

    output::print_info(&report, app.config(), output_mode)?;
    Ok(())
}

/// Execute the traverse command
pub fn execute_traverse(app: &App, args: &TraverseArgs, output_mode: OutputMode) -> Result<()> {
    let options = TraverseOptions {
        include_self: !args.exclude_self,
        direct_only: args.direct,
        include_hidden: args.include_hidden,
    };

    let reach = traverse(app.graph(), args.node_id, options)?;
    output::print_reachable(args.node_id, &reach, output_mode)?;
    Ok(())
}

/// Execute the tree command
pub fn execute_tree(app: &App, args: &TreeArgs, output_mode: OutputMode) -> Result<()> {
    let graph = app.graph();
    let tree = project(graph)?;

    let highlight: Vec<String> = args
        .search
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(|q| {
            search::matching_labels(graph.nodes(), q)
                .into_iter()
                .map(|id| id.to_string())
                .collect()
        })
        .unwrap_or_default();

    output::print_tree(&tree, &highlight, app.config(), output_mode)?;
    Ok(())
}

/// Execute the search command
pub fn execute_search(app: &App, args: &SearchArgs, output_mode: OutputMode) -> Result<()> {
    let graph = app.graph();

    let found = match search::find(graph.nodes(), &args.query) {
        Ok(node) => node,
        Err(e) if e.is_notice() => return print_notice(&e, output_mode),
        Err(e) => return Err(e.into()),
    };

    let details = node_details(graph, found.id)?;
    output::print_node_details(&details, output_mode)?;
    Ok(())
}

/// Execute the show command
pub fn execute_show(app: &App, args: &ShowArgs, output_mode: OutputMode) -> Result<()> {
    let details = node_details(app.graph(), args.node_id)?;
    output::print_node_details(&details, output_mode)?;
    Ok(())
}

/// Execute the view command
///
/// Replays the actions in order against the initial reveal state (or the
/// loaded flags with `--no-reset`), then applies the group filter.
pub fn execute_view(app: &App, args: &ViewArgs, output_mode: OutputMode) -> Result<()> {
    let (mut graph, mut collapsed) = if args.no_reset {
        (app.graph().clone(), CollapsedRoots::new())
    } else {
        visibility::reset(app.graph())
    };

    for action in &args.actions {
        match action.kind {
            ActionKind::Toggle => {
                let update = visibility::toggle_descendants(&graph, action.node, &collapsed)?;
                graph = update.graph;
                collapsed = update.collapsed;
            }
            ActionKind::Expand | ActionKind::Collapse => {
                let expand = action.kind == ActionKind::Expand;
                graph = visibility::toggle_direct_children(&graph, action.node, expand)?.0;
            }
        }
        tracing::debug!(%action, "Applied view action");
    }

    let mut groups = app.config().hidden_groups.clone();
    groups.extend(args.hide_groups.iter().copied());
    let graph = visibility::hide_groups(&graph, &groups);

    let view = visible(&graph);
    let report = ViewReport {
        collapsed: &collapsed,
        stats: GraphStats::of(&graph),
        nodes: view.nodes,
        edges: view.edges,
    };
    output::print_view(&report, output_mode)?;
    Ok(())
}

/// Execute the export command
pub fn execute_export(app: &App, args: &ExportArgs, output_mode: OutputMode) -> Result<()> {
    let graph = app.graph();
    let settings = &app.config().export;
    let delimiter = args.delimiter.unwrap_or(settings.delimiter);

    let (records, file_name) = match args.from {
        Some(id) => (export::subtree_records(graph, id)?, &settings.subtree_file_name),
        None => (export::visible_records(graph)?, &settings.file_name),
    };

    let artifact = match export::artifact(file_name.clone(), &records, delimiter) {
        Ok(artifact) => artifact,
        Err(e) if e.is_notice() => return print_notice(&e, output_mode),
        Err(e) => return Err(e.into()),
    };

    let target = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&artifact.file_name));

    if target == Path::new("-") {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(&artifact.content)?;
        handle.flush()?;
        return Ok(());
    }

    std::fs::write(&target, &artifact.content)?;
    tracing::debug!(path = %target.display(), records = records.len(), "Wrote export");

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "path": target.display().to_string(),
            "records": records.len(),
            "bytes": artifact.content.len(),
        }))?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            output::print_message(&output::success(
                &format!(
                    "Exported {} relationship(s) to {}",
                    records.len(),
                    target.display()
                ),
                &config,
            ))?;
        }
    }
    Ok(())
}
