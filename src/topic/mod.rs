//! Topic signals: keyphrase extraction and per-paper topic resolution

pub mod keyphrase;
mod resolver;

pub use keyphrase::{ExtractError, ExtractorConfig, FrequencyExtractor, Keyphrase, KeyphraseExtractor};
pub use resolver::{TopicPolicy, TopicResolver};
