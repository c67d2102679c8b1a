//! Configuration loading for depview.
//!
//! Configuration lives in an optional `depview.yaml`. It is taken from
//! `--config` when given, otherwise found by walking up from the working
//! directory. Every field has a default, so a missing file and an empty file
//! behave the same.
//!
//! ```yaml
//! export:
//!   delimiter: ";"
//!   file-name: object-relationships.csv
//!   subtree-file-name: objectRelationships.csv
//! palette:
//!   TABL: "#cccccc"
//! hidden-groups: [DTEL, TTYP]
//! strict: false
//! ```

use crate::error::ConfigError;
use depview_graph::NodeGroup;
use depview_graph::export::DEFAULT_DELIMITER;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "depview.yaml";

/// Maximum directory depth to traverse when searching for a configuration file
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Default file name for a whole-view export
pub const DEFAULT_EXPORT_FILE_NAME: &str = "object-relationships.csv";

/// Default file name for a per-node subtree export
pub const DEFAULT_SUBTREE_FILE_NAME: &str = "objectRelationships.csv";

/// Top-level configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DepviewConfig {
    /// Export settings
    pub export: ExportConfig,

    /// Color overrides per group; groups not listed use the built-in legend
    pub palette: BTreeMap<NodeGroup, String>,

    /// Groups hidden in every view
    pub hidden_groups: BTreeSet<NodeGroup>,

    /// Fail the load on dangling edges instead of dropping them
    pub strict: bool,
}

/// Export section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExportConfig {
    /// Field delimiter
    pub delimiter: char,

    /// Artifact name for whole-view exports
    pub file_name: String,

    /// Artifact name for subtree exports
    pub subtree_file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            subtree_file_name: DEFAULT_SUBTREE_FILE_NAME.to_string(),
        }
    }
}

/// Legend color of a group when the configuration does not override it.
pub fn default_color(group: NodeGroup) -> &'static str {
    match group {
        NodeGroup::Func => "#f5ab70",
        NodeGroup::Meth | NodeGroup::Dtel => "#059494",
        NodeGroup::Stru => "#00b8ff",
        NodeGroup::Type => "darkslateblue",
        NodeGroup::Ttyp => "coral",
        NodeGroup::Tabl => "white",
        NodeGroup::Tran => "grey",
        NodeGroup::View => "yellow",
        NodeGroup::Prog => "red",
    }
}

impl DepviewConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist. Without one, the nearest `depview.yaml`
    /// at or above `working_dir` is used, falling back to defaults.
    pub fn resolve(explicit: Option<&Path>, working_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load(path);
        }

        match find_config(working_dir) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Using configuration file");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Color for `group`, configured or built in.
    pub fn color(&self, group: NodeGroup) -> &str {
        self.palette
            .get(&group)
            .map_or_else(|| default_color(group), String::as_str)
    }

    /// The complete palette with defaults filled in.
    pub fn palette(&self) -> BTreeMap<NodeGroup, String> {
        NodeGroup::ALL
            .into_iter()
            .map(|g| (g, self.color(g).to_string()))
            .collect()
    }
}

/// Find the nearest configuration file by searching up the directory tree.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
