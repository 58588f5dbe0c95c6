//! Keyphrase extraction from free text
//!
//! The topic resolver asks an extractor for the most salient phrases of a
//! paper's abstract. `FrequencyExtractor` is the built-in implementation: a
//! RAKE-style scorer over contiguous runs of content words, restricted to a
//! configured n-gram range.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// A phrase with its relevance in `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct Keyphrase {
    pub phrase: String,
    pub score: f64,
}

/// Errors from keyphrase extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("extractor unavailable: {0}")]
    Unavailable(String),
}

/// Collaborator producing ranked keyphrases for a text.
///
/// Stop words and n-gram range are fixed when the extractor is built; a
/// call only chooses how many phrases to return.
pub trait KeyphraseExtractor: Send + Sync {
    /// Up to `top_n` phrases, best first
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<Keyphrase>, ExtractError>;
}

/// English stop words that never appear inside a keyphrase
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "again", "against", "all", "almost", "also",
    "although", "always", "am", "among", "an", "and", "another", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "done", "down", "due", "during", "each",
    "either", "else", "enough", "etc", "even", "ever", "every", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "however", "i", "if", "in", "into", "is", "it", "its", "itself",
    "just", "least", "less", "many", "may", "me", "might", "more", "most", "much", "must",
    "my", "myself", "neither", "no", "nor", "not", "now", "of", "off", "often", "on", "once",
    "one", "only", "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out",
    "over", "own", "per", "perhaps", "rather", "same", "several", "she", "should", "since",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves",
    "then", "there", "therefore", "these", "they", "this", "those", "though", "through",
    "thus", "to", "too", "toward", "towards", "two", "under", "until", "up", "upon", "us",
    "use", "used", "using", "very", "via", "was", "we", "well", "were", "what", "whether",
    "when", "where", "which", "while", "who", "whom", "whose", "why", "will", "with",
    "within", "without", "would", "yet", "you", "your", "yours",
    // Boilerplate common to abstracts
    "paper", "propose", "proposed", "present", "show", "shows", "study", "work", "approach",
    "results", "based", "new", "different", "various",
];

/// Configuration for `FrequencyExtractor`
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Shortest phrase, in words
    pub ngram_min: usize,
    /// Longest phrase, in words
    pub ngram_max: usize,
    /// Tokens shorter than this are treated as stop words
    pub min_token_len: usize,
    pub stop_words: HashSet<String>,
}

impl ExtractorConfig {
    /// English stop words, 1- and 2-word phrases
    pub fn english() -> Self {
        Self {
            ngram_min: 1,
            ngram_max: 2,
            min_token_len: 2,
            stop_words: ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn with_ngram_range(mut self, min: usize, max: usize) -> Self {
        self.ngram_min = min.max(1);
        self.ngram_max = max.max(self.ngram_min);
        self
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::english()
    }
}

/// Statistical keyphrase extractor.
///
/// Text is split into runs of content words at punctuation and stop words.
/// Each word scores `degree / frequency` over those runs; a candidate
/// n-gram scores the sum of its word scores, boosted by how often the
/// n-gram itself occurs.
#[derive(Debug, Clone, Default)]
pub struct FrequencyExtractor {
    config: ExtractorConfig,
}

impl FrequencyExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Maximal runs of content words, lowercased
    fn content_runs(&self, text: &str) -> Vec<Vec<String>> {
        let mut runs = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut word = String::new();

        let end_word = |word: &mut String, current: &mut Vec<String>, runs: &mut Vec<Vec<String>>| {
            if word.is_empty() {
                return;
            }
            let token = word.trim_matches('-').to_lowercase();
            word.clear();
            if self.is_content_word(&token) {
                current.push(token);
            } else if !current.is_empty() {
                runs.push(std::mem::take(current));
            }
        };

        for c in text.chars() {
            if c.is_alphanumeric() || (c == '-' && !word.is_empty()) {
                word.push(c);
            } else if c.is_whitespace() {
                end_word(&mut word, &mut current, &mut runs);
            } else {
                // Punctuation ends the phrase as well as the word
                end_word(&mut word, &mut current, &mut runs);
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
        end_word(&mut word, &mut current, &mut runs);
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    fn is_content_word(&self, token: &str) -> bool {
        token.chars().count() >= self.config.min_token_len
            && !token.chars().all(|c| c.is_ascii_digit())
            && !self.config.stop_words.contains(token)
    }
}

impl KeyphraseExtractor for FrequencyExtractor {
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<Keyphrase>, ExtractError> {
        if top_n == 0 {
            return Ok(Vec::new());
        }
        let runs = self.content_runs(text);
        if runs.is_empty() {
            return Ok(Vec::new());
        }

        let mut frequency: HashMap<&str, f64> = HashMap::new();
        let mut degree: HashMap<&str, f64> = HashMap::new();
        for run in &runs {
            for word in run {
                *frequency.entry(word.as_str()).or_default() += 1.0;
                *degree.entry(word.as_str()).or_default() += run.len() as f64;
            }
        }

        // Candidate n-grams with occurrence count and first position
        let mut candidates: Vec<(Vec<&str>, usize)> = Vec::new();
        let mut seen: HashMap<Vec<&str>, usize> = HashMap::new();
        for run in &runs {
            for n in self.config.ngram_min..=self.config.ngram_max {
                if n > run.len() {
                    break;
                }
                for window in run.windows(n) {
                    let words: Vec<&str> = window.iter().map(String::as_str).collect();
                    match seen.get(&words) {
                        Some(&idx) => candidates[idx].1 += 1,
                        None => {
                            seen.insert(words.clone(), candidates.len());
                            candidates.push((words, 1));
                        }
                    }
                }
            }
        }

        let mut scored: Vec<(usize, Vec<&str>, f64)> = candidates
            .into_iter()
            .enumerate()
            .map(|(position, (words, count))| {
                let base: f64 = words.iter().map(|w| degree[w] / frequency[w]).sum();
                let score = base * (1.0 + (count as f64).ln());
                (position, words, score)
            })
            .collect();
        scored.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)));

        let best = scored.first().map(|s| s.2).unwrap_or(1.0);
        let mut selected: Vec<(Vec<&str>, f64)> = Vec::new();
        for (_, words, score) in scored {
            if selected.len() >= top_n {
                break;
            }
            let overlaps = selected
                .iter()
                .any(|(chosen, _)| is_sub_phrase(&words, chosen) || is_sub_phrase(chosen, &words));
            if !overlaps {
                selected.push((words, score));
            }
        }

        Ok(selected
            .into_iter()
            .map(|(words, score)| Keyphrase {
                phrase: words.join(" "),
                score: if best > 0.0 { score / best } else { 0.0 },
            })
            .collect())
    }
}

/// True if `needle` occurs as a contiguous word sequence in `haystack`
fn is_sub_phrase(needle: &[&str], haystack: &[&str]) -> bool {
    needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|w| w == needle)
}
