//! Provider records and the canonical paper record they normalize into

use super::arxiv::ArxivEntry;
use super::openalex::OpenAlexWork;
use super::semantic_scholar::S2Paper;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which bibliographic provider a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Arxiv,
    #[serde(alias = "s2")]
    SemanticScholar,
    #[serde(rename = "openalex")]
    OpenAlex,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Arxiv => "arxiv",
            SourceKind::SemanticScholar => "semantic_scholar",
            SourceKind::OpenAlex => "openalex",
        }
    }

    /// Parse a kind from config or seed-prefix spelling
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arxiv" => Some(SourceKind::Arxiv),
            "semantic_scholar" | "semanticscholar" | "s2" => Some(SourceKind::SemanticScholar),
            "openalex" | "open_alex" => Some(SourceKind::OpenAlex),
            _ => None,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication date at whatever precision the provider gives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Published {
    Timestamp(DateTime<Utc>),
    Day(NaiveDate),
    Year(i32),
}

impl Published {
    /// Parse an RFC 3339 timestamp, a `YYYY-MM-DD` day, or a bare year
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Some(Published::Timestamp(ts.with_timezone(&Utc)));
        }
        if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(Published::Day(day));
        }
        s.parse::<i32>().ok().filter(|y| (1000..=9999).contains(y)).map(Published::Year)
    }

    pub fn year(&self) -> i32 {
        match self {
            Published::Timestamp(ts) => ts.year(),
            Published::Day(day) => day.year(),
            Published::Year(year) => *year,
        }
    }

    /// ISO-8601 rendering at the stored precision
    pub fn to_iso(&self) -> String {
        match self {
            Published::Timestamp(ts) => ts.to_rfc3339(),
            Published::Day(day) => day.format("%Y-%m-%d").to_string(),
            Published::Year(year) => year.to_string(),
        }
    }
}

/// The one record shape the adapter works with, whatever the provider
#[derive(Debug, Clone, PartialEq)]
pub struct PaperRecord {
    pub source: SourceKind,
    /// Provider-native id, used unprefixed as the paper node id
    pub native_id: String,
    pub title: String,
    pub abstract_text: Option<String>,
    pub published: Option<Published>,
    /// Landing page or PDF
    pub url: Option<String>,
    pub authors: Vec<String>,
    /// Labels from the provider's own taxonomy, in provider order
    pub official_topics: Vec<String>,
}

/// A raw record as returned by one provider
#[derive(Debug, Clone)]
pub enum RawRecord {
    Arxiv(ArxivEntry),
    SemanticScholar(S2Paper),
    OpenAlex(OpenAlexWork),
}

impl RawRecord {
    pub fn source(&self) -> SourceKind {
        match self {
            RawRecord::Arxiv(_) => SourceKind::Arxiv,
            RawRecord::SemanticScholar(_) => SourceKind::SemanticScholar,
            RawRecord::OpenAlex(_) => SourceKind::OpenAlex,
        }
    }

    /// Normalize into a `PaperRecord`.
    ///
    /// `None` when the record lacks a native id or a usable title.
    pub fn into_paper(self) -> Option<PaperRecord> {
        let paper = match self {
            RawRecord::Arxiv(entry) => entry.into_paper(),
            RawRecord::SemanticScholar(paper) => paper.into_paper(),
            RawRecord::OpenAlex(work) => work.into_paper(),
        }?;
        if paper.native_id.trim().is_empty() || paper.title.trim().is_empty() {
            return None;
        }
        Some(paper)
    }
}

/// Collapse runs of whitespace into single spaces
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalized text, or `None` if nothing is left
pub(crate) fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(normalize_whitespace).filter(|s| !s.is_empty())
}
