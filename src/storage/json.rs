//! JSON file storage backend
//!
//! The graph lives in one human-readable file, `{"nodes": [...], "links": [...]}`,
//! rewritten in full on every flush.

use super::traits::{GraphStore, OpenStore, StorageError, StorageResult};
use crate::graph::{GraphSnapshot, PaperGraph};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Graph store backed by a single pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    /// Sibling file the new content is written to before it replaces `path`
    fn staging_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// Where an unparseable graph file is copied before it can be overwritten
    pub fn backup_path(&self) -> PathBuf {
        self.sibling(".bak")
    }
}

impl OpenStore for JsonFileStore {
    fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl GraphStore for JsonFileStore {
    fn load(&self) -> PaperGraph {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no graph file yet, starting empty");
                return PaperGraph::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "graph file unreadable, starting empty");
                return PaperGraph::new();
            }
        };

        match serde_json::from_str::<GraphSnapshot>(&content) {
            Ok(snapshot) => {
                tracing::debug!(
                    path = %self.path.display(),
                    nodes = snapshot.nodes.len(),
                    links = snapshot.links.len(),
                    "loaded graph"
                );
                PaperGraph::from_snapshot(snapshot)
            }
            Err(e) => {
                let backup = self.backup_path();
                match fs::write(&backup, &content) {
                    Ok(()) => tracing::warn!(
                        path = %self.path.display(),
                        backup = %backup.display(),
                        error = %e,
                        "graph file malformed, starting empty"
                    ),
                    Err(copy_err) => tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        backup_error = %copy_err,
                        "graph file malformed and could not be backed up, starting empty"
                    ),
                }
                PaperGraph::new()
            }
        }
    }

    fn flush(&self, snapshot: &GraphSnapshot) -> StorageResult<()> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let staging = self.staging_path();
        {
            let mut file = fs::File::create(&staging)?;
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&staging, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            nodes = snapshot.nodes.len(),
            links = snapshot.links.len(),
            "flushed graph"
        );
        Ok(())
    }
}
