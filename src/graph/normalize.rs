//! Identifier normalization
//!
//! Node ids are a pure function of (group, natural key). Papers use the
//! provider-native id as-is; authors and topics are keyed by a normalized
//! fragment of their display text.

/// Fragment used when the text has nothing to key on.
pub const UNKNOWN_FRAGMENT: &str = "unknown";

/// Prefix for author node ids.
pub const AUTHOR_PREFIX: &str = "auth_";

/// Prefix for topic node ids.
pub const TOPIC_PREFIX: &str = "topic_";

/// Reduce free text to a lowercase fragment of its alphanumeric characters.
///
/// Whitespace, punctuation and separators are dropped. Text with no
/// alphanumeric characters (including empty text) maps to `"unknown"`.
/// Distinct names that reduce to the same fragment share one node.
pub fn normalize(text: &str) -> String {
    let fragment: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect();

    if fragment.is_empty() {
        UNKNOWN_FRAGMENT.to_string()
    } else {
        fragment
    }
}

/// Node id for an author display name.
pub fn author_id(name: &str) -> String {
    format!("{}{}", AUTHOR_PREFIX, normalize(name))
}

/// Node id for a topic label.
pub fn topic_id(label: &str) -> String {
    format!("{}{}", TOPIC_PREFIX, normalize(label))
}
