//! Core graph data structures

mod link;
mod node;
pub mod normalize;
mod paper_graph;


pub use link::{value, Link, LinkKey};
pub use node::{val, Attributes, Node, NodeGroup};
pub use normalize::{author_id, normalize, topic_id};
pub use paper_graph::{GraphSnapshot, PaperGraph};
