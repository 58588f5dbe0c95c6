//! OpenAlex provider

use super::http::{build_client, check_status, RateLimiter};
use super::record::{non_empty, normalize_whitespace, PaperRecord, Published, RawRecord, SourceKind};
use super::traits::{Provider, ProviderError, SearchPage};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const OPENALEX_API_BASE: &str = "https://api.openalex.org";
const WORK_URL_PREFIX: &str = "https://openalex.org/";
const MIN_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    meta: Option<WorksMeta>,
    #[serde(default)]
    results: Vec<OpenAlexWork>,
}

#[derive(Debug, Deserialize)]
struct WorksMeta {
    #[serde(default)]
    next_cursor: Option<String>,
}

/// A work as returned by `/works`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OpenAlexWork {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub abstract_inverted_index: Option<HashMap<String, Vec<usize>>>,
    #[serde(default)]
    pub authorships: Option<Vec<Authorship>>,
    #[serde(default)]
    pub topics: Option<Vec<Labeled>>,
    #[serde(default)]
    pub concepts: Option<Vec<Labeled>>,
    #[serde(default)]
    pub primary_location: Option<Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Authorship {
    #[serde(default)]
    pub author: Option<AuthorRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthorRef {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A topic or concept entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Labeled {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub landing_page_url: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

impl OpenAlexWork {
    pub(crate) fn into_paper(self) -> Option<PaperRecord> {
        let native_id = short_work_id(self.id.as_deref()?)?;
        let title = non_empty(self.display_name.as_deref().or(self.title.as_deref()))?;

        let labels = self
            .topics
            .filter(|t| !t.is_empty())
            .or(self.concepts)
            .unwrap_or_default();
        let mut official_topics: Vec<String> = Vec::new();
        for label in labels.into_iter().filter_map(|l| l.display_name) {
            let label = normalize_whitespace(&label);
            if !label.is_empty() && !official_topics.contains(&label) {
                official_topics.push(label);
            }
        }

        let url = self
            .primary_location
            .and_then(|loc| loc.pdf_url.or(loc.landing_page_url))
            .or(self.doi);

        Some(PaperRecord {
            source: SourceKind::OpenAlex,
            native_id,
            title,
            abstract_text: self
                .abstract_inverted_index
                .as_ref()
                .and_then(rebuild_abstract),
            published: self
                .publication_date
                .as_deref()
                .and_then(Published::parse)
                .or(self.publication_year.map(Published::Year)),
            url,
            authors: self
                .authorships
                .unwrap_or_default()
                .into_iter()
                .filter_map(|a| a.author.and_then(|r| non_empty(r.display_name.as_deref())))
                .collect(),
            official_topics,
        })
    }
}

/// `https://openalex.org/W123` or `W123` to `W123`
pub fn short_work_id(id: &str) -> Option<String> {
    let short = id.trim().trim_start_matches(WORK_URL_PREFIX);
    (!short.is_empty() && !short.contains('/')).then(|| short.to_string())
}

/// Abstracts ship as word -> positions; lay the words back out in order
pub fn rebuild_abstract(index: &HashMap<String, Vec<usize>>) -> Option<String> {
    let mut positioned: Vec<(usize, &str)> = index
        .iter()
        .flat_map(|(word, positions)| positions.iter().map(move |&p| (p, word.as_str())))
        .collect();
    if positioned.is_empty() {
        return None;
    }
    positioned.sort_by_key(|(p, _)| *p);
    let text = positioned.into_iter().map(|(_, w)| w).collect::<Vec<_>>().join(" ");
    non_empty(Some(text.as_str()))
}

/// HTTP client for the OpenAlex API
pub struct OpenAlexProvider {
    client: reqwest::Client,
    mailto: Option<String>,
    base_url: String,
    limiter: RateLimiter,
}

impl OpenAlexProvider {
    /// `mailto` puts requests in the polite pool
    pub fn new(mailto: Option<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout)?,
            mailto,
            base_url: OPENALEX_API_BASE.to_string(),
            limiter: RateLimiter::new(MIN_INTERVAL),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn polite(&self, url: &mut String) {
        if let Some(ref mailto) = self.mailto {
            url.push_str(if url.contains('?') { "&" } else { "?" });
            url.push_str("mailto=");
            url.push_str(&urlencoding::encode(mailto));
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        id: Option<&str>,
    ) -> Result<T, ProviderError> {
        self.limiter.wait().await;
        tracing::debug!(url, "OpenAlex request");
        let response = self.client.get(url).send().await?;
        let response = check_status(SourceKind::OpenAlex, response, id)?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Provider for OpenAlexProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::OpenAlex
    }

    async fn search_page(
        &self,
        query: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<SearchPage, ProviderError> {
        let mut url = format!(
            "{}/works?search={}&sort=publication_date:desc&per-page={}&cursor={}",
            self.base_url,
            urlencoding::encode(query),
            limit.clamp(1, 200),
            urlencoding::encode(cursor.unwrap_or("*"))
        );
        self.polite(&mut url);

        let response: WorksResponse = self.get_json(&url, None).await?;
        let next_cursor = if response.results.is_empty() {
            None
        } else {
            response.meta.and_then(|m| m.next_cursor)
        };
        Ok(SearchPage {
            records: response.results.into_iter().map(RawRecord::OpenAlex).collect(),
            next_cursor,
        })
    }

    async fn fetch(&self, id: &str) -> Result<RawRecord, ProviderError> {
        let short = short_work_id(id).ok_or_else(|| ProviderError::InvalidId(id.to_string()))?;
        let mut url = format!("{}/works/{}", self.base_url, urlencoding::encode(&short));
        self.polite(&mut url);
        let work: OpenAlexWork = self.get_json(&url, Some(&short)).await?;
        Ok(RawRecord::OpenAlex(work))
    }
}
