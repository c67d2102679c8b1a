//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that loads the configuration and
//! the graph snapshot every command works on.
//!
//! # Example
//!
//! ```no_run
//! use depview::app::App;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let app = App::load(Path::new("graph.json"), None, Path::new("."))?;
//!     println!("{} nodes", app.graph().node_count());
//!     Ok(())
//! }
//! ```

use crate::config::DepviewConfig;
use crate::error::Result;
use depview_graph::{GraphModel, GraphWarning, loader, visibility};
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
#[derive(Debug)]
pub struct App {
    /// Snapshot with configured hidden groups applied
    graph: GraphModel,

    /// Resolved configuration
    config: DepviewConfig,

    /// File the snapshot was read from
    source: PathBuf,
}

impl App {
    /// Load configuration and the snapshot at `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration cannot be resolved or parsed
    /// - The snapshot cannot be read or decoded
    /// - `strict` is set and the snapshot has a dangling edge
    pub fn load(snapshot: &Path, config_path: Option<&Path>, working_dir: &Path) -> Result<Self> {
        let config = DepviewConfig::resolve(config_path, working_dir)?;
        let graph = loader::load(snapshot)?;

        if config.strict
            && let Some(err) = graph
                .warnings()
                .iter()
                .cloned()
                .find_map(GraphWarning::into_error)
        {
            return Err(err.into());
        }

        let graph = visibility::hide_groups(&graph, &config.hidden_groups);

        tracing::debug!(
            source = %snapshot.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Loaded snapshot"
        );

        Ok(Self {
            graph,
            config,
            source: snapshot.to_path_buf(),
        })
    }

    /// The loaded snapshot.
    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    /// The resolved configuration.
    pub fn config(&self) -> &DepviewConfig {
        &self.config
    }

    /// Path of the snapshot file.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::error::Error;
    use depview_graph::NodeId;
    use tempfile::TempDir;

    const DANGLING: &str = r#"{
        "nodes": [
            {"id": 1, "label": "root", "group": "PROG"},
            {"id": 2, "label": "elem", "group": "DTEL"}
        ],
        "edges": [{"from": 1, "to": 2}, {"from": 1, "to": 9}]
    }"#;

    fn write_snapshot(dir: &Path) -> PathBuf {
        let path = dir.join("graph.json");
        std::fs::write(&path, DANGLING).unwrap();
        path
    }

    #[test]
    fn test_load_without_config() {
        let temp = TempDir::new().unwrap();
        let snapshot = write_snapshot(temp.path());

        let app = App::load(&snapshot, None, temp.path()).unwrap();

        assert_eq!(app.graph().edge_count(), 1);
        assert_eq!(app.graph().warnings().len(), 1);
        assert_eq!(app.source(), snapshot.as_path());
        assert_eq!(app.config(), &DepviewConfig::default());
    }

    #[test]
    fn test_strict_rejects_dangling_edge() {
        let temp = TempDir::new().unwrap();
        let snapshot = write_snapshot(temp.path());
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "strict: true\n").unwrap();

        let err = App::load(&snapshot, None, temp.path()).unwrap_err();
        assert!(matches!(
            err,
            Error::Graph(depview_graph::Error::DanglingEdge { missing: NodeId(9), .. })
        ));
    }

    #[test]
    fn test_hidden_groups_applied() {
        let temp = TempDir::new().unwrap();
        let snapshot = write_snapshot(temp.path());
        let config = temp.path().join("custom.yaml");
        std::fs::write(&config, "hidden-groups: [DTEL]\n").unwrap();

        let app = App::load(&snapshot, Some(&config), temp.path()).unwrap();
        assert!(app.graph().lookup_node(NodeId(2)).unwrap().hidden);
        assert!(!app.graph().lookup_node(NodeId(1)).unwrap().hidden);
    }
}
