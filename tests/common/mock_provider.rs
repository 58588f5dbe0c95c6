//! Scripted collaborators for the aggregation driver

use async_trait::async_trait;
use papernet::source::{Provider, ProviderError, RawRecord, SearchPage, SourceKind};
use papernet::topic::{ExtractError, Keyphrase, KeyphraseExtractor};
use papernet::{NewItem, Notifier, NotifyError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Provider serving a fixed result list and a fixed id table
pub struct MockProvider {
    kind: SourceKind,
    results: Vec<RawRecord>,
    by_id: HashMap<String, RawRecord>,
    fail_search: bool,
    searches: Arc<Mutex<Vec<String>>>,
    fetches: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            results: Vec::new(),
            by_id: HashMap::new(),
            fail_search: false,
            searches: Arc::new(Mutex::new(Vec::new())),
            fetches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Records returned by every search, newest first
    pub fn with_results(mut self, results: Vec<RawRecord>) -> Self {
        self.results = results;
        self
    }

    /// Record returned by `fetch(id)`
    pub fn with_record(mut self, id: &str, record: RawRecord) -> Self {
        self.by_id.insert(id.to_string(), record);
        self
    }

    /// Every search fails with a transport-level error
    pub fn failing(mut self) -> Self {
        self.fail_search = true;
        self
    }

    /// Handle on the queries searched so far
    pub fn searches(&self) -> Arc<Mutex<Vec<String>>> {
        self.searches.clone()
    }

    /// Handle on the ids fetched so far
    pub fn fetches(&self) -> Arc<Mutex<Vec<String>>> {
        self.fetches.clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn search_page(
        &self,
        query: &str,
        _cursor: Option<&str>,
        limit: usize,
    ) -> Result<SearchPage, ProviderError> {
        self.searches.lock().unwrap().push(query.to_string());
        if self.fail_search {
            return Err(ProviderError::Status {
                provider: self.kind,
                status: 503,
            });
        }
        Ok(SearchPage::last(self.results.iter().take(limit).cloned().collect()))
    }

    async fn fetch(&self, id: &str) -> Result<RawRecord, ProviderError> {
        self.fetches.lock().unwrap().push(id.to_string());
        self.by_id
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }
}

/// Notifier that keeps every digest it is asked to deliver
#[derive(Default)]
pub struct RecordingNotifier {
    digests: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn digests(&self) -> Arc<Mutex<Vec<String>>> {
        self.digests.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        self.digests.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Extractor returning the same phrases for any text
pub struct FixedExtractor(pub Vec<&'static str>);

impl KeyphraseExtractor for FixedExtractor {
    fn extract(&self, _text: &str, top_n: usize) -> Result<Vec<Keyphrase>, ExtractError> {
        Ok(self
            .0
            .iter()
            .take(top_n)
            .map(|p| Keyphrase {
                phrase: p.to_string(),
                score: 1.0,
            })
            .collect())
    }
}

/// Titles of new items, in ingestion order
pub fn item_names(items: &[NewItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}
