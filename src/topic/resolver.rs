//! Topic resolution: merge official taxonomy labels with extracted keyphrases

use super::keyphrase::KeyphraseExtractor;
use crate::graph::topic_id;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Bounds on the topics attached to one paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicPolicy {
    /// Most labels taken from the provider's own taxonomy
    pub max_official: usize,
    /// Total topics per paper; keyphrases fill up to this
    pub target: usize,
}

impl Default for TopicPolicy {
    fn default() -> Self {
        Self {
            max_official: 2,
            target: 4,
        }
    }
}

/// Produces the ordered, bounded topic labels for a paper.
///
/// Official labels come first in source order, then keyphrases from the
/// abstract fill the remainder. Labels are lowercased and trimmed; labels
/// that map to the same topic id are kept once. No synonym merging.
pub struct TopicResolver {
    policy: TopicPolicy,
    extractor: Arc<dyn KeyphraseExtractor>,
}

impl TopicResolver {
    pub fn new(policy: TopicPolicy, extractor: Arc<dyn KeyphraseExtractor>) -> Self {
        Self { policy, extractor }
    }

    /// Resolve topic labels from official labels and the abstract
    pub fn resolve(&self, official: &[String], abstract_text: Option<&str>) -> Vec<String> {
        let mut labels = Vec::new();
        let mut ids = HashSet::new();

        for label in official {
            if labels.len() >= self.policy.max_official.min(self.policy.target) {
                break;
            }
            push_label(&mut labels, &mut ids, label);
        }

        let remaining = self.policy.target.saturating_sub(labels.len());
        let text = abstract_text.map(str::trim).filter(|t| !t.is_empty());
        if let Some(text) = text.filter(|_| remaining > 0) {
            // Ask for extra in case some phrases repeat an official label
            match self.extractor.extract(text, remaining + labels.len()) {
                Ok(phrases) => {
                    for keyphrase in phrases {
                        if labels.len() >= self.policy.target {
                            break;
                        }
                        push_label(&mut labels, &mut ids, &keyphrase.phrase);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "keyphrase extraction failed, keeping official topics only");
                }
            }
        }

        labels
    }
}

/// Clean a label to its stored form
fn clean_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn push_label(labels: &mut Vec<String>, ids: &mut HashSet<String>, raw: &str) {
    let label = clean_label(raw);
    if label.is_empty() {
        return;
    }
    if ids.insert(topic_id(&label)) {
        labels.push(label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::keyphrase::{ExtractError, Keyphrase};
    use std::sync::Mutex;

    /// Returns fixed phrases and records requested counts
    struct FixedExtractor {
        phrases: Vec<&'static str>,
        requests: Mutex<Vec<usize>>,
    }

    impl FixedExtractor {
        fn new(phrases: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                phrases,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    impl KeyphraseExtractor for FixedExtractor {
        fn extract(&self, _text: &str, top_n: usize) -> Result<Vec<Keyphrase>, ExtractError> {
            self.requests.lock().unwrap().push(top_n);
            Ok(self
                .phrases
                .iter()
                .take(top_n)
                .map(|p| Keyphrase {
                    phrase: p.to_string(),
                    score: 0.5,
                })
                .collect())
        }
    }

    struct FailingExtractor;

    impl KeyphraseExtractor for FailingExtractor {
        fn extract(&self, _text: &str, _top_n: usize) -> Result<Vec<Keyphrase>, ExtractError> {
            Err(ExtractError::Unavailable("model not loaded".into()))
        }
    }

    fn official(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn official_labels_come_first_and_are_capped() {
        let extractor = FixedExtractor::new(vec!["media", "newsrooms", "audits"]);
        let resolver = TopicResolver::new(TopicPolicy::default(), extractor.clone());

        let topics = resolver.resolve(
            &official(&["Computers and Society", "Machine Learning", "Databases"]),
            Some("abstract"),
        );

        assert_eq!(
            topics,
            vec!["computers and society", "machine learning", "media", "newsrooms"]
        );
    }

    #[test]
    fn keyphrases_fill_when_no_official_labels() {
        let extractor = FixedExtractor::new(vec!["ai ethics", "journalism", "media", "trust", "x"]);
        let resolver = TopicResolver::new(TopicPolicy::default(), extractor.clone());

        let topics = resolver.resolve(&[], Some("about ai ethics"));

        assert_eq!(topics, vec!["ai ethics", "journalism", "media", "trust"]);
        assert_eq!(*extractor.requests.lock().unwrap(), vec![4]);
    }

    #[test]
    fn duplicate_of_official_label_is_skipped() {
        let extractor = FixedExtractor::new(vec!["Machine  Learning", "fairness", "audits", "x"]);
        let resolver = TopicResolver::new(TopicPolicy::default(), extractor);

        let topics = resolver.resolve(&official(&["machine learning"]), Some("text"));

        assert_eq!(topics, vec!["machine learning", "fairness", "audits", "x"]);
    }

    #[test]
    fn no_abstract_means_no_extraction() {
        let extractor = FixedExtractor::new(vec!["unused"]);
        let resolver = TopicResolver::new(TopicPolicy::default(), extractor.clone());

        assert_eq!(resolver.resolve(&official(&["cs.CY"]), None), vec!["cs.cy"]);
        assert!(resolver.resolve(&[], Some("   ")).is_empty());
        assert!(extractor.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn extractor_failure_keeps_official_labels() {
        let resolver = TopicResolver::new(TopicPolicy::default(), Arc::new(FailingExtractor));
        let topics = resolver.resolve(&official(&["Digital Libraries"]), Some("some abstract"));
        assert_eq!(topics, vec!["digital libraries"]);
    }

    #[test]
    fn blank_official_labels_are_ignored() {
        let extractor = FixedExtractor::new(vec![]);
        let policy = TopicPolicy {
            max_official: 1,
            target: 3,
        };
        let resolver = TopicResolver::new(policy, extractor);
        let topics = resolver.resolve(&official(&["  ", "Information Retrieval", "Other"]), None);
        assert_eq!(topics, vec!["information retrieval"]);
    }
}
