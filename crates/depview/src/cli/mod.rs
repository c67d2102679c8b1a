//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for depview using clap's
//! derive API. Every command reads one graph snapshot (`.json` or `.jsonl`)
//! given as its first argument.
//!
//! # Commands
//!
//! - `info`: Statistics, legend, diagnostics and load warnings
//! - `traverse`: Nodes and edges reachable from a node
//! - `tree`: Hierarchical projection with group rows
//! - `search`: First node matching a query
//! - `show`: Node details and neighbourhood
//! - `view`: Replay show/hide actions and print what stays visible
//! - `export`: Write relationships as delimited text
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//! - `--config`: Configuration file instead of the nearest `depview.yaml`
//!
//! # Example
//!
//! ```bash
//! depview info graph.json
//! depview traverse graph.json 12 --exclude-self
//! depview view graph.json --action toggle:1 --action collapse:12
//! depview export graph.json --from 12 --delimiter ';'
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub use args::{ExportArgs, InfoArgs, SearchArgs, ShowArgs, TraverseArgs, TreeArgs, ViewArgs};
pub use types::{ActionKind, ViewAction};
pub use validators::{validate_delimiter, validate_group, validate_node_id, validate_view_action};

/// Depview - explore object dependency graphs
///
/// Reads a dependency graph snapshot produced by the query layer and lets you
/// walk, fold, search and export it.
#[derive(Parser, Debug)]
#[command(name = "depview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to the nearest depview.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show snapshot information
    ///
    /// Displays visible counts, the group legend, cycle and component
    /// diagnostics, and any records dropped while loading.
    Info(InfoArgs),

    /// List everything reachable from a node
    ///
    /// Follows outgoing edges depth-first, skipping hidden nodes and
    /// self-loops. Each node and edge is listed once.
    Traverse(TraverseArgs),

    /// Show the snapshot as a tree
    ///
    /// Each node is placed under the source of the first edge reaching it,
    /// with siblings clustered by group.
    Tree(TreeArgs),

    /// Find the first node matching a query
    ///
    /// Matches label or technical name, ignoring case.
    Search(SearchArgs),

    /// Show details about a node
    Show(ShowArgs),

    /// Replay show/hide actions
    ///
    /// Starts from the initial state (only the root visible) and applies each
    /// --action in order.
    View(ViewArgs),

    /// Export relationships as delimited text
    ///
    /// Exports every visible edge, or with --from the subtree of one node.
    Export(ExportArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let working_dir = std::env::current_dir()?;
        let load = |snapshot: &Path| App::load(snapshot, self.config.as_deref(), &working_dir);

        match &self.command {
            Some(Commands::Info(args)) => {
                execute::execute_info(&load(&args.snapshot)?, args, output_mode)
            }
            Some(Commands::Traverse(args)) => {
                execute::execute_traverse(&load(&args.snapshot)?, args, output_mode)
            }
            Some(Commands::Tree(args)) => {
                execute::execute_tree(&load(&args.snapshot)?, args, output_mode)
            }
            Some(Commands::Search(args)) => {
                execute::execute_search(&load(&args.snapshot)?, args, output_mode)
            }
            Some(Commands::Show(args)) => {
                execute::execute_show(&load(&args.snapshot)?, args, output_mode)
            }
            Some(Commands::View(args)) => {
                execute::execute_view(&load(&args.snapshot)?, args, output_mode)
            }
            Some(Commands::Export(args)) => {
                execute::execute_export(&load(&args.snapshot)?, args, output_mode)
            }
            None => {
                println!("Depview dependency graph explorer");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}
