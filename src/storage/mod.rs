//! Storage backends for the paper graph
//!
//! Persistence goes through the `GraphStore` trait. `JsonFileStore` is the
//! durable backend; `MemoryStore` backs tests.

mod json;
mod memory;
mod seeds;
mod traits;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use seeds::load_seeds;
pub use traits::{GraphStore, OpenStore, StorageError, StorageResult};
