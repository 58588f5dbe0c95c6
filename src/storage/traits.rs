//! Storage trait definitions

use crate::graph::{GraphSnapshot, PaperGraph};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while persisting the graph
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for graph persistence backends
///
/// `load` never fails: a missing or unreadable store is an empty graph.
/// `flush` writes the whole graph, replacing whatever was stored.
pub trait GraphStore: Send + Sync {
    /// Read the persisted graph, or an empty one if there is none usable
    fn load(&self) -> PaperGraph;

    /// Replace the persisted graph with `snapshot`
    fn flush(&self, snapshot: &GraphSnapshot) -> StorageResult<()>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: GraphStore + Sized {
    /// Open a store at the given path; the file need not exist yet
    fn open(path: impl AsRef<Path>) -> Self;
}
