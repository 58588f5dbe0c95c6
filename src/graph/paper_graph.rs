//! PaperGraph: the in-memory, append-only graph mutated during a run

use super::link::{Link, LinkKey};
use super::node::{Node, NodeGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The persisted shape of the graph: `{"nodes": [...], "links": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Append-only graph with dedup-safe insertion.
///
/// Insertion order of nodes and links is preserved. Existence checks go
/// through id/pair indexes kept in step with the vectors, so a node added
/// earlier in the same run is visible to every later check.
#[derive(Debug, Clone, Default)]
pub struct PaperGraph {
    snapshot: GraphSnapshot,
    node_ids: HashSet<String>,
    link_keys: HashSet<LinkKey>,
}

impl PaperGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a loaded snapshot, indexing what it already contains.
    ///
    /// Duplicates already present in the snapshot are kept as-is; nodes and
    /// links are never removed.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let node_ids = snapshot.nodes.iter().map(|n| n.id.clone()).collect();
        let link_keys = snapshot.links.iter().map(Link::key).collect();
        Self {
            snapshot,
            node_ids,
            link_keys,
        }
    }

    /// The graph in its persisted shape
    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.snapshot
    }

    /// Append a node unless one with the same id exists.
    ///
    /// Returns `false` without touching the graph when the id is known; the
    /// stored node keeps the fields from its first insertion.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.node_ids.contains(&node.id) {
            return false;
        }
        self.node_ids.insert(node.id.clone());
        self.snapshot.nodes.push(node);
        true
    }

    /// Append a link unless `{source, target}` is already linked in either
    /// order. Endpoints are not validated against the node set.
    ///
    /// Returns whether a link was appended.
    pub fn add_link(&mut self, source: &str, target: &str, value: f64) -> bool {
        let link = Link::new(source, target, value);
        if !self.link_keys.insert(link.key()) {
            return false;
        }
        self.snapshot.links.push(link);
        true
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_ids.contains(id)
    }

    /// Get a node by id (first occurrence)
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.snapshot.nodes.iter().find(|n| n.id == id)
    }

    pub fn has_link(&self, a: &str, b: &str) -> bool {
        self.link_keys.contains(&LinkKey::new(a, b))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.snapshot.nodes.iter()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.snapshot.links.iter()
    }

    pub fn node_count(&self) -> usize {
        self.snapshot.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.snapshot.links.len()
    }

    /// Number of nodes in a group
    pub fn group_count(&self, group: NodeGroup) -> usize {
        self.snapshot.nodes.iter().filter(|n| n.group == group).count()
    }
}

impl From<GraphSnapshot> for PaperGraph {
    fn from(snapshot: GraphSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}
