//! Papernet: incremental knowledge graph of research papers
//!
//! Pulls records from bibliographic providers (arXiv, Semantic Scholar,
//! OpenAlex) and merges them into one persisted, deduplicated graph of
//! papers, authors and topics. Re-running over the same data never grows
//! the graph.
//!
//! # Core Concepts
//!
//! - **Nodes**: papers keyed by provider id, authors and topics keyed by a
//!   normalized name
//! - **Links**: undirected paper–author and paper–topic relations
//! - **Runs**: load, seed, ingest live queries, flush only if something is new
//!
//! # Example
//!
//! ```
//! use papernet::{author_id, Node, NodeGroup, PaperGraph};
//!
//! let mut graph = PaperGraph::new();
//! assert!(graph.add_node(Node::new(author_id("A. One"), "A. One", NodeGroup::Author, 15.0)));
//! assert!(!graph.add_node(Node::new(author_id("a one"), "a one", NodeGroup::Author, 15.0)));
//! assert_eq!(graph.node_count(), 1);
//! ```

pub mod config;
pub mod driver;
mod graph;
pub mod notify;
pub mod source;
pub mod storage;
pub mod topic;

pub use config::{AggregatorConfig, ConfigError, NotifierConfig, QueryConfig, SourceConfig, TopicsConfig};
pub use driver::{AggregateError, Aggregator, RunPhase, RunReport};
pub use graph::{
    author_id, normalize, topic_id, val, value, Attributes, GraphSnapshot, Link, LinkKey, Node,
    NodeGroup, PaperGraph,
};
pub use notify::{NewItem, Notifier, NotifyError};
pub use source::{PaperRecord, Provider, ProviderError, RawRecord, SourceKind};
pub use storage::{load_seeds, GraphStore, JsonFileStore, MemoryStore, OpenStore, StorageError, StorageResult};
pub use topic::{KeyphraseExtractor, TopicPolicy, TopicResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
