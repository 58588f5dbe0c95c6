//! Node representation in the paper graph

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Group-specific node attributes.
///
/// Persisted flattened into the node object, so keys written by other
/// tools survive a load/flush cycle untouched.
pub type Attributes = serde_json::Map<String, Value>;

/// Rendering-size hints, fixed per group
pub mod val {
    /// Paper ingested from the seed list
    pub const SEED_PAPER: f64 = 40.0;
    /// Paper discovered by a live query
    pub const PAPER: f64 = 25.0;
    pub const AUTHOR: f64 = 15.0;
    pub const TOPIC: f64 = 10.0;
}

/// Entity kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    Paper,
    Author,
    Topic,
}

impl NodeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeGroup::Paper => "paper",
            NodeGroup::Author => "author",
            NodeGroup::Topic => "topic",
        }
    }
}

impl std::fmt::Display for NodeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A node in the paper graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique across the whole graph
    pub id: String,
    /// Display name (paper title, author name, topic label)
    pub name: String,
    pub group: NodeGroup,
    /// Rendering-size hint
    pub val: f64,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Node {
    /// Create a node with no attributes
    pub fn new(id: impl Into<String>, name: impl Into<String>, group: NodeGroup, val: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group,
            val,
            attributes: Attributes::new(),
        }
    }

    /// Add an attribute to the node
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get a string attribute
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}
