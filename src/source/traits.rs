//! Provider trait, the contract every bibliographic source implements

use super::record::{RawRecord, SourceKind};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from provider calls. All of them are recoverable for a run.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned status {status}")]
    Status { provider: SourceKind, status: u16 },

    #[error("rate limited by {0}")]
    RateLimited(SourceKind),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("response parse error: {0}")]
    Parse(String),

    #[error("invalid id: {0}")]
    InvalidId(String),
}

/// One page of search results
#[derive(Debug, Default)]
pub struct SearchPage {
    pub records: Vec<RawRecord>,
    /// Cursor for the following page, `None` when this was the last
    pub next_cursor: Option<String>,
}

impl SearchPage {
    pub fn last(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            next_cursor: None,
        }
    }
}

/// A bibliographic data source.
///
/// Search results come newest first. Paging is cursor based so each
/// provider can use its own scheme (offsets, opaque tokens).
#[async_trait]
pub trait Provider: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Fetch one page of results for `query`, starting at `cursor`
    /// (`None` for the first page), with at most `limit` records.
    async fn search_page(
        &self,
        query: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<SearchPage, ProviderError>;

    /// Look up a single record by provider-native id
    async fn fetch(&self, id: &str) -> Result<RawRecord, ProviderError>;
}
