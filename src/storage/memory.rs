//! In-memory storage backend, for tests and dry runs

use super::traits::{GraphStore, StorageResult};
use crate::graph::{GraphSnapshot, PaperGraph};
use std::sync::Mutex;

/// Graph store holding its snapshot in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<GraphSnapshot>,
    flushes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot
    pub fn with_snapshot(snapshot: GraphSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            flushes: Mutex::new(0),
        }
    }

    /// The last flushed (or initial) snapshot
    pub fn current(&self) -> GraphSnapshot {
        self.snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of successful flushes so far
    pub fn flush_count(&self) -> usize {
        *self.flushes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl GraphStore for MemoryStore {
    fn load(&self) -> PaperGraph {
        PaperGraph::from_snapshot(self.current())
    }

    fn flush(&self, snapshot: &GraphSnapshot) -> StorageResult<()> {
        *self.snapshot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = snapshot.clone();
        *self.flushes.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, NodeGroup};

    #[test]
    fn flush_replaces_snapshot_and_counts() {
        let store = MemoryStore::new();
        assert_eq!(store.load().node_count(), 0);

        let mut graph = store.load();
        graph.add_node(Node::new("p", "P", NodeGroup::Paper, 25.0));
        store.flush(graph.snapshot()).unwrap();

        assert_eq!(store.flush_count(), 1);
        assert!(store.load().contains_node("p"));
    }
}
