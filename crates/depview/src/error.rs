//! Error types for depview CLI operations.

use std::path::PathBuf;
use thiserror::Error;

/// The error type for depview CLI operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Graph engine error.
    #[error(transparent)]
    Graph(#[from] depview_graph::Error),
}

/// Problems locating or reading `depview.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file could not be read.
    #[error("cannot read configuration file {}: {source}", .path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for this schema.
    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },
}

/// A specialized Result type for depview operations.
pub type Result<T> = std::result::Result<T, Error>;
