//! arXiv provider: Atom API client and feed parsing

use super::http::{build_client, check_status, RateLimiter};
use super::record::{non_empty, normalize_whitespace, PaperRecord, Published, RawRecord, SourceKind};
use super::traits::{Provider, ProviderError, SearchPage};
use async_trait::async_trait;
use std::time::Duration;

const ARXIV_API_BASE: &str = "https://export.arxiv.org/api/query";

/// arXiv asks clients to leave 3 seconds between calls
const MIN_INTERVAL: Duration = Duration::from_secs(3);

/// One `<entry>` of an arXiv Atom feed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArxivEntry {
    /// Entry id URL, e.g. `http://arxiv.org/abs/2401.01234v1`
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub published: Option<String>,
    pub authors: Vec<String>,
    pub primary_category: Option<String>,
    pub categories: Vec<String>,
    pub pdf_url: Option<String>,
    pub abs_url: Option<String>,
    pub doi: Option<String>,
}

impl ArxivEntry {
    pub(crate) fn into_paper(self) -> Option<PaperRecord> {
        let native_id = extract_arxiv_id_from_url(&self.id);
        let title = normalize_whitespace(&self.title);

        let mut official_topics: Vec<String> = Vec::new();
        for code in self.primary_category.iter().chain(self.categories.iter()) {
            let label = category_label(code);
            if !official_topics.contains(&label) {
                official_topics.push(label);
            }
        }

        Some(PaperRecord {
            source: SourceKind::Arxiv,
            native_id,
            title,
            abstract_text: non_empty(self.summary.as_deref()),
            published: self.published.as_deref().and_then(Published::parse),
            url: self.pdf_url.or(self.abs_url),
            authors: self
                .authors
                .iter()
                .map(|a| normalize_whitespace(a))
                .filter(|a| !a.is_empty())
                .collect(),
            official_topics,
        })
    }
}

/// HTTP client for the arXiv API
pub struct ArxivProvider {
    client: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
}

impl ArxivProvider {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: ARXIV_API_BASE.to_string(),
            limiter: RateLimiter::new(MIN_INTERVAL),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_feed(&self, url: &str, id: Option<&str>) -> Result<Vec<ArxivEntry>, ProviderError> {
        self.limiter.wait().await;
        tracing::debug!(url, "arXiv request");
        let response = self.client.get(url).send().await?;
        let response = check_status(SourceKind::Arxiv, response, id)?;
        let body = response.text().await?;
        Ok(parse_feed(&body))
    }
}

#[async_trait]
impl Provider for ArxivProvider {
    fn kind(&self) -> SourceKind {
        SourceKind::Arxiv
    }

    async fn search_page(
        &self,
        query: &str,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<SearchPage, ProviderError> {
        let start: usize = match cursor {
            Some(c) => c
                .parse()
                .map_err(|_| ProviderError::Parse(format!("bad arXiv cursor '{}'", c)))?,
            None => 0,
        };
        let url = build_search_url(&self.base_url, query, start, limit);
        let entries = self.get_feed(&url, None).await?;

        let returned = entries.len();
        let next_cursor = (returned > 0 && returned >= limit).then(|| (start + returned).to_string());
        Ok(SearchPage {
            records: entries.into_iter().map(RawRecord::Arxiv).collect(),
            next_cursor,
        })
    }

    async fn fetch(&self, id: &str) -> Result<RawRecord, ProviderError> {
        let clean_id = id.trim();
        if !is_arxiv_id(clean_id) {
            return Err(ProviderError::InvalidId(clean_id.to_string()));
        }
        let url = format!("{}?id_list={}", self.base_url, urlencoding::encode(clean_id));
        self.get_feed(&url, Some(clean_id))
            .await?
            .into_iter()
            .next()
            .map(RawRecord::Arxiv)
            .ok_or_else(|| ProviderError::NotFound(clean_id.to_string()))
    }
}

/// Search URL, newest submissions first
pub fn build_search_url(base_url: &str, query: &str, start: usize, max_results: usize) -> String {
    format!(
        "{}?search_query={}&start={}&max_results={}&sortBy=submittedDate&sortOrder=descending",
        base_url,
        urlencoding::encode(query),
        start,
        max_results,
    )
}

// ── Feed parsing ──────────────────────────────────────────────

/// Parse all entries of an Atom feed. Error entries and entries without
/// an id are dropped.
pub fn parse_feed(xml: &str) -> Vec<ArxivEntry> {
    extract_blocks(xml, "<entry>", "</entry>")
        .into_iter()
        .filter_map(parse_entry)
        .collect()
}

fn parse_entry(entry: &str) -> Option<ArxivEntry> {
    let id = extract_tag_text(entry, "id")?;
    // arXiv reports bad ids as an entry pointing at its errors page
    if id.contains("/api/errors") {
        return None;
    }

    let authors = extract_blocks(entry, "<author>", "</author>")
        .into_iter()
        .filter_map(|block| extract_tag_text(block, "name"))
        .collect();

    let categories = extract_tags(entry, "<category")
        .into_iter()
        .filter_map(|tag| extract_attribute(tag, "term"))
        .collect();
    let primary_category = extract_tags(entry, "<arxiv:primary_category")
        .into_iter()
        .find_map(|tag| extract_attribute(tag, "term"));

    let mut pdf_url = None;
    let mut abs_url = None;
    for tag in extract_tags(entry, "<link") {
        let href = extract_attribute(tag, "href").unwrap_or_default();
        let title = extract_attribute(tag, "title").unwrap_or_default();
        let link_type = extract_attribute(tag, "type").unwrap_or_default();
        if title == "pdf" || link_type == "application/pdf" {
            pdf_url = Some(href);
        } else if href.contains("/abs/") {
            abs_url = Some(href);
        }
    }

    Some(ArxivEntry {
        abs_url: abs_url.or_else(|| Some(id.clone())),
        id,
        title: extract_tag_text(entry, "title").unwrap_or_default(),
        summary: extract_tag_text(entry, "summary"),
        published: extract_tag_text(entry, "published"),
        authors,
        primary_category,
        categories,
        pdf_url,
        doi: extract_tag_text(entry, "arxiv:doi"),
    })
}

/// All `open ... close` blocks, inclusive
fn extract_blocks<'a>(xml: &'a str, open: &str, close: &str) -> Vec<&'a str> {
    let mut blocks = Vec::new();
    let mut from = 0;
    while let Some(pos) = xml[from..].find(open) {
        let start = from + pos;
        let Some(len) = xml[start..].find(close) else {
            break;
        };
        let end = start + len + close.len();
        blocks.push(&xml[start..end]);
        from = end;
    }
    blocks
}

/// All opening tags starting with `prefix`, up to their closing `>`
fn extract_tags<'a>(xml: &'a str, prefix: &str) -> Vec<&'a str> {
    let mut tags = Vec::new();
    let mut from = 0;
    while let Some(pos) = xml[from..].find(prefix) {
        let start = from + pos;
        let Some(len) = xml[start..].find('>') else {
            break;
        };
        let end = start + len + 1;
        tags.push(&xml[start..end]);
        from = end;
    }
    tags
}

/// Decoded text of the first `<tag ...>text</tag>`
fn extract_tag_text(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let mut from = 0;
    loop {
        let start = from + xml[from..].find(&open)?;
        // Skip longer tag names sharing the prefix (`<id` vs `<idx>`)
        let after = xml[start + open.len()..].chars().next()?;
        if after == '>' || after.is_whitespace() {
            let content_start = start + xml[start..].find('>')? + 1;
            let content_end = content_start + xml[content_start..].find(&close)?;
            return Some(decode_entities(xml[content_start..content_end].trim()));
        }
        from = start + open.len();
    }
}

/// Value of `attr="..."` inside a tag
fn extract_attribute(tag: &str, attr: &str) -> Option<String> {
    let search = format!(" {}=\"", attr);
    let start = tag.find(&search)? + search.len();
    let end = start + tag[start..].find('"')?;
    Some(decode_entities(&tag[start..end]))
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// The arXiv id from an entry URL like `http://arxiv.org/abs/1706.03762v7`
pub fn extract_arxiv_id_from_url(url: &str) -> String {
    let url = url.trim();
    if let Some(pos) = url.rfind("/abs/") {
        url[pos + 5..].to_string()
    } else if let Some(pos) = url.rfind("/pdf/") {
        url[pos + 5..].trim_end_matches(".pdf").to_string()
    } else {
        url.rsplit('/').next().unwrap_or_default().to_string()
    }
}

/// True for new-style (`2401.01234`, optional `vN`) and old-style
/// (`hep-th/9901001`) arXiv identifiers
pub fn is_arxiv_id(id: &str) -> bool {
    let id = strip_version(id);
    if let Some((archive, number)) = id.split_once('/') {
        return !archive.is_empty()
            && archive.chars().all(|c| c.is_ascii_alphabetic() || c == '-' || c == '.')
            && number.len() == 7
            && number.chars().all(|c| c.is_ascii_digit());
    }
    if let Some((yymm, number)) = id.split_once('.') {
        return yymm.len() == 4
            && yymm.chars().all(|c| c.is_ascii_digit())
            && (4..=5).contains(&number.len())
            && number.chars().all(|c| c.is_ascii_digit());
    }
    false
}

fn strip_version(id: &str) -> &str {
    match id.rfind('v') {
        Some(pos)
            if pos + 1 < id.len()
                && id[pos + 1..].chars().all(|c| c.is_ascii_digit())
                && id[..pos].ends_with(|c: char| c.is_ascii_digit()) =>
        {
            &id[..pos]
        }
        _ => id,
    }
}

/// Human-readable name for an arXiv category code; unknown codes pass through
pub fn category_label(code: &str) -> String {
    let name = match code {
        "cs.AI" => "artificial intelligence",
        "cs.CL" => "computation and language",
        "cs.CR" => "cryptography and security",
        "cs.CV" => "computer vision and pattern recognition",
        "cs.CY" => "computers and society",
        "cs.DB" => "databases",
        "cs.DC" => "distributed, parallel, and cluster computing",
        "cs.DL" => "digital libraries",
        "cs.DS" => "data structures and algorithms",
        "cs.GT" => "computer science and game theory",
        "cs.HC" => "human-computer interaction",
        "cs.IR" => "information retrieval",
        "cs.LG" => "machine learning",
        "cs.MA" => "multiagent systems",
        "cs.NE" => "neural and evolutionary computing",
        "cs.NI" => "networking and internet architecture",
        "cs.PL" => "programming languages",
        "cs.RO" => "robotics",
        "cs.SE" => "software engineering",
        "cs.SI" => "social and information networks",
        "econ.GN" => "general economics",
        "physics.soc-ph" => "physics and society",
        "q-bio.NC" => "neurons and cognition",
        "stat.ML" => "machine learning (statistics)",
        other => return other.to_string(),
    };
    name.to_string()
}
