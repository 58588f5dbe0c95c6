//! Record and configuration builders

use papernet::source::semantic_scholar::{S2Author, S2Paper};
use papernet::source::{RawRecord, SourceKind};
use papernet::{AggregatorConfig, QueryConfig, SourceConfig};
use std::path::{Path, PathBuf};

/// A Semantic Scholar record with the given id, title, authors and abstract
pub fn s2_paper(id: &str, title: &str, authors: &[&str], abstract_text: &str) -> RawRecord {
    RawRecord::SemanticScholar(S2Paper {
        paper_id: Some(id.to_string()),
        title: Some(title.to_string()),
        abstract_text: Some(abstract_text.to_string()),
        year: Some(2024),
        publication_date: Some("2024-05-01".to_string()),
        authors: Some(
            authors
                .iter()
                .map(|name| S2Author {
                    name: Some(name.to_string()),
                })
                .collect(),
        ),
        url: Some(format!("https://www.semanticscholar.org/paper/{}", id)),
        ..Default::default()
    })
}

/// One Semantic Scholar query, store under `dir`, no seeds, no seed delay
pub fn test_config(dir: &Path) -> AggregatorConfig {
    AggregatorConfig {
        store_path: dir.join("graph_data.json"),
        seed_path: None,
        seed_delay_ms: 0,
        seed_source: SourceKind::SemanticScholar,
        sources: vec![SourceConfig::SemanticScholar { api_key_env: None }],
        queries: vec![QueryConfig {
            source: SourceKind::SemanticScholar,
            query: "ai ethics".to_string(),
            max_results: 10,
            page_size: None,
        }],
        ..AggregatorConfig::default()
    }
}

/// Write a seed file under `dir` and return its path
pub fn write_seeds(dir: &Path, seeds: &[&str]) -> PathBuf {
    let path = dir.join("seeds.json");
    std::fs::write(&path, serde_json::to_string(seeds).unwrap()).unwrap();
    path
}
