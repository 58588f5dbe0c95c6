//! Run configuration
//!
//! One `AggregatorConfig` is read from YAML and passed to the driver. Secrets
//! are never stored in the file; it names the environment variables that
//! hold them.

use crate::source::SourceKind;
use crate::topic::TopicPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything one aggregation run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Persisted graph file
    pub store_path: PathBuf,
    /// JSON array of seed ids; `None` disables seeding
    pub seed_path: Option<PathBuf>,
    /// Pause before each seed fetch after the first
    pub seed_delay_ms: u64,
    /// Provider for seed ids whose shape names none
    pub seed_source: SourceKind,
    pub request_timeout_secs: u64,
    pub sources: Vec<SourceConfig>,
    pub queries: Vec<QueryConfig>,
    pub topics: TopicsConfig,
    pub notifier: Option<NotifierConfig>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("docs/graph_data.json"),
            seed_path: Some(PathBuf::from("seeds.json")),
            seed_delay_ms: 3000,
            seed_source: SourceKind::Arxiv,
            request_timeout_secs: 30,
            sources: Vec::new(),
            queries: Vec::new(),
            topics: TopicsConfig::default(),
            notifier: None,
        }
    }
}

impl AggregatorConfig {
    /// Read and validate a YAML config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parse and validate YAML text
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// arXiv only, with the computers-and-society query
    pub fn arxiv_default() -> Self {
        Self {
            sources: vec![SourceConfig::Arxiv],
            queries: vec![QueryConfig {
                source: SourceKind::Arxiv,
                query: r#"cat:cs.CY AND ("AI" OR "Journalism" OR "Media" OR "Ethics")"#.to_string(),
                max_results: 10,
                page_size: None,
            }],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = Vec::new();
        for source in &self.sources {
            if seen.contains(&source.kind()) {
                return Err(ConfigError::Invalid(format!(
                    "source '{}' configured more than once",
                    source.kind()
                )));
            }
            seen.push(source.kind());
        }

        for query in &self.queries {
            if !seen.contains(&query.source) {
                return Err(ConfigError::Invalid(format!(
                    "query '{}' uses source '{}' which is not configured",
                    query.query, query.source
                )));
            }
            if query.query.trim().is_empty() {
                return Err(ConfigError::Invalid("empty query string".to_string()));
            }
        }

        let policy = self.topics.policy();
        if policy.target == 0 || policy.target <= policy.max_official {
            return Err(ConfigError::Invalid(format!(
                "topics.target ({}) must be positive and above topics.max_official ({})",
                policy.target, policy.max_official
            )));
        }
        if self.topics.ngram_max == 0 {
            return Err(ConfigError::Invalid("topics.ngram_max must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn source(&self, kind: SourceKind) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.kind() == kind)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn seed_delay(&self) -> Duration {
        Duration::from_millis(self.seed_delay_ms)
    }
}

/// A provider to enable, with its credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Arxiv,
    #[serde(alias = "s2")]
    SemanticScholar {
        /// Environment variable holding the API key
        #[serde(default)]
        api_key_env: Option<String>,
    },
    #[serde(rename = "openalex")]
    OpenAlex {
        /// Contact address for the polite pool
        #[serde(default)]
        mailto: Option<String>,
    },
}

impl SourceConfig {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceConfig::Arxiv => SourceKind::Arxiv,
            SourceConfig::SemanticScholar { .. } => SourceKind::SemanticScholar,
            SourceConfig::OpenAlex { .. } => SourceKind::OpenAlex,
        }
    }
}

/// A live query against one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    pub source: SourceKind,
    pub query: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

fn default_max_results() -> usize {
    10
}

/// Topic policy plus keyphrase settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicsConfig {
    pub max_official: usize,
    pub target: usize,
    /// Longest extracted keyphrase, in words
    pub ngram_max: usize,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        let policy = TopicPolicy::default();
        Self {
            max_official: policy.max_official,
            target: policy.target,
            ngram_max: 2,
        }
    }
}

impl TopicsConfig {
    pub fn policy(&self) -> TopicPolicy {
        TopicPolicy {
            max_official: self.max_official,
            target: self.target,
        }
    }
}

/// Where to send the new-paper digest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotifierConfig {
    Telegram {
        #[serde(default = "default_bot_token_env")]
        bot_token_env: String,
        chat_id: String,
        #[serde(default = "default_preview")]
        preview: usize,
    },
    Webhook {
        /// Environment variable holding the webhook URL
        url_env: String,
        #[serde(default = "default_preview")]
        preview: usize,
    },
}

fn default_bot_token_env() -> String {
    "TELEGRAM_TOKEN".to_string()
}

fn default_preview() -> usize {
    crate::notify::DEFAULT_PREVIEW
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
store_path: out/graph.json
seed_path: seeds.json
seed_delay_ms: 500
seed_source: openalex
sources:
  - kind: arxiv
  - kind: semantic_scholar
    api_key_env: S2_API_KEY
  - kind: openalex
    mailto: someone@example.org
queries:
  - source: arxiv
    query: 'cat:cs.CY AND (AI OR Media)'
    max_results: 20
  - source: openalex
    query: algorithmic journalism
topics:
  max_official: 1
  target: 3
notifier:
  kind: telegram
  chat_id: "12345"
"#;

    #[test]
    fn parses_full_config() {
        let config = AggregatorConfig::from_yaml(FULL).unwrap();

        assert_eq!(config.store_path, PathBuf::from("out/graph.json"));
        assert_eq!(config.seed_delay(), Duration::from_millis(500));
        assert_eq!(config.seed_source, SourceKind::OpenAlex);
        assert_eq!(config.sources.len(), 3);
        assert_eq!(
            config.source(SourceKind::SemanticScholar),
            Some(&SourceConfig::SemanticScholar {
                api_key_env: Some("S2_API_KEY".to_string())
            })
        );
        assert_eq!(config.queries[0].max_results, 20);
        assert_eq!(config.queries[1].max_results, 10);
        assert_eq!(config.topics.policy(), TopicPolicy { max_official: 1, target: 3 });
        assert_eq!(config.topics.ngram_max, 2);
        assert_eq!(
            config.notifier,
            Some(NotifierConfig::Telegram {
                bot_token_env: "TELEGRAM_TOKEN".to_string(),
                chat_id: "12345".to_string(),
                preview: 5,
            })
        );
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let config = AggregatorConfig::from_yaml("sources:\n  - kind: arxiv\n").unwrap();
        assert_eq!(config.store_path, PathBuf::from("docs/graph_data.json"));
        assert_eq!(config.seed_delay_ms, 3000);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.queries.is_empty());
        assert!(config.notifier.is_none());
    }

    #[test]
    fn rejects_query_for_unconfigured_source() {
        let err = AggregatorConfig::from_yaml(
            "sources:\n  - kind: arxiv\nqueries:\n  - source: openalex\n    query: x\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("openalex")));
    }

    #[test]
    fn rejects_topic_target_not_above_official() {
        let err = AggregatorConfig::from_yaml("topics:\n  max_official: 3\n  target: 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_duplicate_sources() {
        let err = AggregatorConfig::from_yaml("sources:\n  - kind: arxiv\n  - kind: arxiv\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_source_kind() {
        let err = AggregatorConfig::from_yaml("sources:\n  - kind: pubmed\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn built_in_default_is_valid() {
        let config = AggregatorConfig::arxiv_default();
        config.validate().unwrap();
        assert_eq!(config.queries[0].max_results, 10);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AggregatorConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
