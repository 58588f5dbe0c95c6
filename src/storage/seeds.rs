//! Seed list loading
//!
//! The seed file is a JSON array of provider-native paper ids. It is read
//! once per run; any problem with it means "no seeds".

use std::fs;
use std::path::Path;

/// Read the seed ids at `path`, in file order.
///
/// Blank entries are dropped and surrounding whitespace trimmed. A missing
/// or malformed file yields an empty list.
pub fn load_seeds(path: &Path) -> Vec<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no seed file");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "seed file unreadable, ignoring");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<String>>(&content) {
        Ok(ids) => ids
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "seed file malformed, ignoring");
            Vec::new()
        }
    }
}
