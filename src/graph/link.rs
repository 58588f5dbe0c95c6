//! Undirected weighted links between nodes

use serde::{Deserialize, Serialize};

/// Link weights, fixed per relation
pub mod value {
    /// Paper to author
    pub const AUTHOR: f64 = 5.0;
    /// Paper to topic, always below `AUTHOR`
    pub const TOPIC: f64 = 2.0;
}

/// An undirected relation between two nodes.
///
/// `source`/`target` record the order of creation only; `(a, b)` and
/// `(b, a)` are the same link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub value: f64,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value,
        }
    }

    /// Order-independent identity of this link
    pub fn key(&self) -> LinkKey {
        LinkKey::new(&self.source, &self.target)
    }
}

/// Unordered endpoint pair identifying a link
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkKey(String, String);

impl LinkKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_endpoint_order() {
        assert_eq!(LinkKey::new("p1", "auth_x"), LinkKey::new("auth_x", "p1"));
        assert_eq!(
            Link::new("a", "b", 1.0).key(),
            Link::new("b", "a", 9.0).key()
        );
    }

    #[test]
    fn key_distinguishes_pairs() {
        assert_ne!(LinkKey::new("a", "b"), LinkKey::new("a", "c"));
    }
}
