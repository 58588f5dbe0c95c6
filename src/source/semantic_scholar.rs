//! Semantic Scholar provider: Graph API client

use super::http::{build_client, check_status, RateLimiter};
use super::record::{non_empty, normalize_whitespace, PaperRecord, Published, RawRecord, SourceKind};
use super::traits::{Provider, ProviderError, SearchPage};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const S2_API_BASE: &str = "https://api.semanticscholar.org/graph/v1";
const S2_FIELDS: &str =
    "paperId,title,abstract,year,publicationDate,authors,fieldsOfStudy,s2FieldsOfStudy,url,openAccessPdf";

/// Unauthenticated callers share a small pool; keyed callers get more
const MIN_INTERVAL: Duration = Duration::from_secs(3);
const MIN_INTERVAL_WITH_KEY: Duration = Duration::from_secs(1);

/// Bulk search response
#[derive(Debug, Deserialize)]
struct BulkSearchResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    data: Vec<S2Paper>,
}

/// A paper as returned by the Graph API
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct S2Paper {
    #[serde(rename = "paperId", default)]
    pub paper_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(rename = "publicationDate", default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<S2Author>>,
    #[serde(rename = "fieldsOfStudy", default)]
    pub fields_of_study: Option<Vec<String>>,
    #[serde(rename = "s2FieldsOfStudy", default)]
    pub s2_fields_of_study: Option<Vec<S2Field>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "openAccessPdf", default)]
    pub open_access_pdf: Option<S2Pdf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct S2Author {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct S2Field {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct S2Pdf {
    #[serde(default)]
    pub url: Option<String>,
}

impl S2Paper {
    pub(crate) fn into_paper(self) -> Option<PaperRecord> {
        let native_id = self.paper_id?;
        let title = non_empty(self.title.as_deref())?;

        // Curated fields first, then the model-assigned ones
        let mut official_topics: Vec<String> = Vec::new();
        let curated = self.fields_of_study.unwrap_or_default();
        let assigned = self
            .s2_fields_of_study
            .unwrap_or_default()
            .into_iter()
            .filter_map(|f| f.category);
        for label in curated.into_iter().chain(assigned) {
            let label = normalize_whitespace(&label);
            if !label.is_empty() && !official_topics.contains(&label) {
                official_topics.push(label);
            }
        }

        let published = self
            .publication_date
            .as_deref()
            .and_then(Published::parse)
            .or(self.year.map(Published::Year));

        let url = self
            .open_access_pdf
            .and_then(|pdf| pdf.url)
            .filter(|u| !u.is_empty())
            .or(self.url);

        Some(PaperRecord {
            source: SourceKind::SemanticScholar,
            native_id,
            title,
            abstract_text: non_empty(self.abstract_text.as_deref()),
            published,
            url,
            authors: self
                .authors
                .unwrap_or_default()
                .into_iter()
                .filter_map(|a| non_empty(a.name.as_deref()))
                .collect(),
            official_topics,
        })
    }
}

/// HTTP client for the Semantic Scholar Graph API
pub struct SemanticScholarProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    limiter: RateLimiter,
}

impl SemanticScholarProvider {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let interval = if api_key.is_some() {
            MIN_INTERVAL_WITH_KEY
        } else {
            MIN_INTERVAL
        };
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: S2_API_BASE.to_string(),
            limiter: RateLimiter::new(interval),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        id: Option<&str>,
    ) -> Result<T, ProviderError> {
        self.limiter.wait().await;
        tracing::debug!(url, "Semantic Scholar request");
        let mut request = self.client.get(url);
        if let Some(ref key) = self.api_key {
            request = request.header("x-api-key", key);
        }
        let response = check_status(SourceKind::SemanticScholar, request.send().await?, id)?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Provider for SemanticScholarProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::SemanticScholar
    }

    /// Bulk search sorted by publication date; pages are token-linked and
    /// `limit` only bounds what the caller consumes.
    async fn search_page(
        &self,
        query: &str,
        cursor: Option<&str>,
        _limit: usize,
    ) -> Result<SearchPage, ProviderError> {
        let mut url = format!(
            "{}/paper/search/bulk?query={}&sort=publicationDate:desc&fields={}",
            self.base_url,
            urlencoding::encode(query),
            S2_FIELDS
        );
        if let Some(token) = cursor {
            url.push_str("&token=");
            url.push_str(&urlencoding::encode(token));
        }

        let response: BulkSearchResponse = self.get_json(&url, None).await?;
        Ok(SearchPage {
            next_cursor: response.token.filter(|t| !t.is_empty() && !response.data.is_empty()),
            records: response.data.into_iter().map(RawRecord::SemanticScholar).collect(),
        })
    }

    async fn fetch(&self, id: &str) -> Result<RawRecord, ProviderError> {
        let clean_id = id.trim();
        if clean_id.is_empty() {
            return Err(ProviderError::InvalidId(id.to_string()));
        }
        let url = format!(
            "{}/paper/{}?fields={}",
            self.base_url,
            urlencoding::encode(clean_id),
            S2_FIELDS
        );
        let paper: S2Paper = self.get_json(&url, Some(clean_id)).await?;
        Ok(RawRecord::SemanticScholar(paper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAPER: &str = r#"{
        "paperId": "649def34f8be52c8b66281af98ae884c09aef38b",
        "title": "Construction of the Literature Graph in Semantic Scholar",
        "abstract": "We describe a deployed scalable system\nfor organizing published literature.",
        "year": 2018,
        "publicationDate": "2018-05-06",
        "authors": [{"authorId": "1741101", "name": "Waleed Ammar"}, {"authorId": null, "name": " "}],
        "fieldsOfStudy": ["Computer Science"],
        "s2FieldsOfStudy": [
            {"category": "Computer Science", "source": "external"},
            {"category": "Linguistics", "source": "s2-fos-model"}
        ],
        "url": "https://www.semanticscholar.org/paper/649def34",
        "openAccessPdf": {"url": "https://aclanthology.org/N18-3011.pdf", "status": "HYBRID"}
    }"#;

    #[test]
    fn paper_normalizes_into_record() {
        let paper: S2Paper = serde_json::from_str(SAMPLE_PAPER).unwrap();
        let record = paper.into_paper().unwrap();

        assert_eq!(record.source, SourceKind::SemanticScholar);
        assert_eq!(record.native_id, "649def34f8be52c8b66281af98ae884c09aef38b");
        assert_eq!(record.authors, vec!["Waleed Ammar"]);
        assert_eq!(record.official_topics, vec!["Computer Science", "Linguistics"]);
        assert_eq!(record.url.as_deref(), Some("https://aclanthology.org/N18-3011.pdf"));
        assert_eq!(record.published.unwrap().to_iso(), "2018-05-06");
        assert_eq!(
            record.abstract_text.as_deref(),
            Some("We describe a deployed scalable system for organizing published literature.")
        );
    }

    #[test]
    fn null_collections_and_missing_pdf_are_tolerated() {
        let paper: S2Paper = serde_json::from_str(
            r#"{"paperId": "abc", "title": "T", "abstract": null, "year": 2020,
                "authors": null, "fieldsOfStudy": null, "openAccessPdf": null,
                "url": "https://www.semanticscholar.org/paper/abc"}"#,
        )
        .unwrap();
        let record = paper.into_paper().unwrap();

        assert!(record.authors.is_empty());
        assert!(record.official_topics.is_empty());
        assert!(record.abstract_text.is_none());
        assert_eq!(record.published, Some(Published::Year(2020)));
        assert_eq!(record.url.as_deref(), Some("https://www.semanticscholar.org/paper/abc"));
    }

    #[test]
    fn missing_id_or_title_is_malformed() {
        let no_id: S2Paper = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert!(no_id.into_paper().is_none());

        let no_title: S2Paper = serde_json::from_str(r#"{"paperId": "x", "title": "  "}"#).unwrap();
        assert!(no_title.into_paper().is_none());
    }

    #[test]
    fn bulk_response_parses() {
        let response: BulkSearchResponse = serde_json::from_str(&format!(
            r#"{{"total": 1, "token": "NEXT", "data": [{}]}}"#,
            SAMPLE_PAPER
        ))
        .unwrap();
        assert_eq!(response.token.as_deref(), Some("NEXT"));
        assert_eq!(response.data.len(), 1);
    }
}
