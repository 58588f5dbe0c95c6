//! Bibliographic sources
//!
//! Each provider returns raw records in its own shape (`RawRecord` has one
//! variant per provider). Records normalize into a single `PaperRecord`, and
//! `RecordAdapter` turns that into graph mutations.

mod adapter;
pub mod arxiv;
pub(crate) mod http;
pub mod openalex;
mod pager;
mod record;
mod seed;
pub mod semantic_scholar;
mod traits;

pub use adapter::{IngestOutcome, Priority, RecordAdapter};
pub use arxiv::ArxivProvider;
pub use openalex::OpenAlexProvider;
pub use pager::{RecordPager, DEFAULT_PAGE_SIZE};
pub use record::{normalize_whitespace, PaperRecord, Published, RawRecord, SourceKind};
pub use seed::{route_seed, SeedTarget};
pub use semantic_scholar::SemanticScholarProvider;
pub use traits::{Provider, ProviderError, SearchPage};

use crate::config::SourceConfig;
use std::time::Duration;

/// Build the HTTP provider for a configured source
pub fn from_config(config: &SourceConfig, timeout: Duration) -> Result<Box<dyn Provider>, ProviderError> {
    Ok(match config {
        SourceConfig::Arxiv => Box::new(ArxivProvider::new(timeout)?),
        SourceConfig::SemanticScholar { api_key_env } => {
            let api_key = api_key_env.as_deref().and_then(|name| {
                let key = std::env::var(name).ok().filter(|k| !k.trim().is_empty());
                if key.is_none() {
                    tracing::warn!(env = name, "Semantic Scholar API key not set, using shared rate limit");
                }
                key
            });
            Box::new(SemanticScholarProvider::new(api_key, timeout)?)
        }
        SourceConfig::OpenAlex { mailto } => Box::new(OpenAlexProvider::new(mailto.clone(), timeout)?),
    })
}
