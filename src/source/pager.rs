//! Lazy, page-on-demand iteration over a provider's search results

use super::record::RawRecord;
use super::traits::{Provider, ProviderError};
use std::collections::VecDeque;

/// Default records requested per page
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Pulls search results one record at a time, fetching a page only when
/// the buffered one runs out.
///
/// The sequence ends at `max_results`, when the provider returns an empty
/// page, or when it stops handing out a cursor.
pub struct RecordPager<'a> {
    provider: &'a dyn Provider,
    query: String,
    page_size: usize,
    max_results: usize,
    buffer: VecDeque<RawRecord>,
    cursor: Option<String>,
    yielded: usize,
    exhausted: bool,
}

impl<'a> RecordPager<'a> {
    pub fn new(provider: &'a dyn Provider, query: impl Into<String>, max_results: usize) -> Self {
        Self {
            provider,
            query: query.into(),
            page_size: DEFAULT_PAGE_SIZE,
            max_results,
            buffer: VecDeque::new(),
            cursor: None,
            yielded: 0,
            exhausted: max_results == 0,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Records handed out so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Next record, `Ok(None)` once the sequence is finished.
    ///
    /// An error leaves the pager exhausted.
    pub async fn next(&mut self) -> Result<Option<RawRecord>, ProviderError> {
        if self.yielded >= self.max_results {
            return Ok(None);
        }
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.fill().await {
                self.exhausted = true;
                return Err(e);
            }
        }
        match self.buffer.pop_front() {
            Some(record) => {
                self.yielded += 1;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn fill(&mut self) -> Result<(), ProviderError> {
        let remaining = self.max_results - self.yielded;
        let limit = self.page_size.min(remaining);
        let page = self
            .provider
            .search_page(&self.query, self.cursor.as_deref(), limit)
            .await?;

        tracing::debug!(
            provider = %self.provider.kind(),
            query = %self.query,
            records = page.records.len(),
            more = page.next_cursor.is_some(),
            "fetched page"
        );

        if page.records.is_empty() || page.next_cursor.is_none() {
            self.exhausted = true;
        }
        self.cursor = page.next_cursor;
        self.buffer.extend(page.records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::arxiv::ArxivEntry;
    use crate::source::record::SourceKind;
    use crate::source::traits::SearchPage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves `total` numbered entries in pages, recording each request
    struct Numbered {
        total: usize,
        calls: Mutex<Vec<(Option<String>, usize)>>,
        fail_after: Option<usize>,
    }

    impl Numbered {
        fn new(total: usize) -> Self {
            Self {
                total,
                calls: Mutex::new(Vec::new()),
                fail_after: None,
            }
        }
    }

    #[async_trait]
    impl Provider for Numbered {
        fn kind(&self) -> SourceKind {
            SourceKind::Arxiv
        }

        async fn search_page(
            &self,
            _query: &str,
            cursor: Option<&str>,
            limit: usize,
        ) -> Result<SearchPage, ProviderError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((cursor.map(String::from), limit));
            if self.fail_after.is_some_and(|n| calls.len() > n) {
                return Err(ProviderError::Parse("boom".into()));
            }
            let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
            let end = (start + limit).min(self.total);
            let records = (start..end)
                .map(|i| {
                    RawRecord::Arxiv(ArxivEntry {
                        id: format!("http://arxiv.org/abs/{}", i),
                        title: format!("Paper {}", i),
                        ..Default::default()
                    })
                })
                .collect();
            Ok(SearchPage {
                records,
                next_cursor: (end < self.total).then(|| end.to_string()),
            })
        }

        async fn fetch(&self, id: &str) -> Result<RawRecord, ProviderError> {
            Err(ProviderError::NotFound(id.to_string()))
        }
    }

    async fn drain(pager: &mut RecordPager<'_>) -> Vec<String> {
        let mut ids = Vec::new();
        while let Some(RawRecord::Arxiv(entry)) = pager.next().await.unwrap() {
            ids.push(entry.title);
        }
        ids
    }

    #[tokio::test]
    async fn stops_at_max_results() {
        let provider = Numbered::new(100);
        let mut pager = RecordPager::new(&provider, "q", 5).with_page_size(2);
        let titles = drain(&mut pager).await;

        assert_eq!(titles, vec!["Paper 0", "Paper 1", "Paper 2", "Paper 3", "Paper 4"]);
        // Last page only asks for what is still wanted
        let calls = provider.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(None, 2), (Some("2".to_string()), 2), (Some("4".to_string()), 1)]
        );
    }

    #[tokio::test]
    async fn stops_when_provider_runs_dry() {
        let provider = Numbered::new(3);
        let mut pager = RecordPager::new(&provider, "q", 10).with_page_size(2);
        assert_eq!(drain(&mut pager).await.len(), 3);
        assert_eq!(pager.yielded(), 3);
        assert_eq!(provider.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn pages_are_fetched_lazily() {
        let provider = Numbered::new(10);
        let mut pager = RecordPager::new(&provider, "q", 10).with_page_size(4);
        assert!(provider.calls.lock().unwrap().is_empty());

        pager.next().await.unwrap();
        assert_eq!(provider.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn error_ends_the_sequence() {
        let mut provider = Numbered::new(10);
        provider.fail_after = Some(1);
        let mut pager = RecordPager::new(&provider, "q", 10).with_page_size(2);

        assert!(pager.next().await.unwrap().is_some());
        assert!(pager.next().await.unwrap().is_some());
        assert!(pager.next().await.is_err());
        assert!(pager.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn zero_max_results_never_calls_provider() {
        let provider = Numbered::new(10);
        let mut pager = RecordPager::new(&provider, "q", 0);
        assert!(pager.next().await.unwrap().is_none());
        assert!(provider.calls.lock().unwrap().is_empty());
    }
}
