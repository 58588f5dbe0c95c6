//! Routing seed identifiers to the provider that can resolve them

use super::arxiv::is_arxiv_id;
use super::record::SourceKind;

/// Where a seed id should be looked up, and under which id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTarget {
    pub kind: SourceKind,
    pub id: String,
}

/// Route a seed identifier.
///
/// An explicit `arxiv:`, `s2:` or `openalex:` prefix wins. Otherwise the id
/// shape decides: arXiv ids go to arXiv, `W…` work ids to OpenAlex, DOIs to
/// Semantic Scholar. Anything else goes to `fallback`.
pub fn route_seed(seed: &str, fallback: SourceKind) -> SeedTarget {
    let seed = seed.trim();

    if let Some((prefix, rest)) = seed.split_once(':') {
        if let Some(kind) = SourceKind::from_str_loose(prefix) {
            return SeedTarget {
                kind,
                id: rest.trim().to_string(),
            };
        }
    }

    if is_arxiv_id(seed) {
        return SeedTarget {
            kind: SourceKind::Arxiv,
            id: seed.to_string(),
        };
    }
    if is_openalex_work_id(seed) {
        return SeedTarget {
            kind: SourceKind::OpenAlex,
            id: seed.to_string(),
        };
    }
    if let Some(doi) = strip_doi(seed) {
        return SeedTarget {
            kind: SourceKind::SemanticScholar,
            id: format!("DOI:{}", doi),
        };
    }

    SeedTarget {
        kind: fallback,
        id: seed.to_string(),
    }
}

fn is_openalex_work_id(id: &str) -> bool {
    let id = id.strip_prefix("https://openalex.org/").unwrap_or(id);
    id.len() > 1 && id.starts_with('W') && id[1..].chars().all(|c| c.is_ascii_digit())
}

/// Bare DOI from `10.…`, `doi:10.…` or a doi.org URL
fn strip_doi(id: &str) -> Option<&str> {
    let lower = id.to_ascii_lowercase();
    let offset = ["https://doi.org/", "http://doi.org/", "doi:"]
        .iter()
        .find(|p| lower.starts_with(*p))
        .map_or(0, |p| p.len());
    let doi = &id[offset..];
    (doi.starts_with("10.") && doi.contains('/')).then_some(doi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(kind: SourceKind, id: &str) -> SeedTarget {
        SeedTarget {
            kind,
            id: id.to_string(),
        }
    }

    #[test]
    fn explicit_prefix_wins() {
        assert_eq!(
            route_seed("s2:649def34f8be52c8b66281af98ae884c09aef38b", SourceKind::Arxiv),
            target(SourceKind::SemanticScholar, "649def34f8be52c8b66281af98ae884c09aef38b")
        );
        assert_eq!(
            route_seed("openalex:W2741809807", SourceKind::Arxiv),
            target(SourceKind::OpenAlex, "W2741809807")
        );
        assert_eq!(
            route_seed("arxiv:2401.01234", SourceKind::OpenAlex),
            target(SourceKind::Arxiv, "2401.01234")
        );
        assert_eq!(
            route_seed("semantic_scholar:DOI:10.7717/peerj.4375", SourceKind::Arxiv),
            target(SourceKind::SemanticScholar, "DOI:10.7717/peerj.4375")
        );
        assert_eq!(
            route_seed("OpenAlex:W2741809807", SourceKind::Arxiv),
            target(SourceKind::OpenAlex, "W2741809807")
        );
    }

    #[test]
    fn id_shape_picks_provider() {
        assert_eq!(
            route_seed("2401.01234v2", SourceKind::OpenAlex),
            target(SourceKind::Arxiv, "2401.01234v2")
        );
        assert_eq!(
            route_seed("hep-th/9901001", SourceKind::OpenAlex),
            target(SourceKind::Arxiv, "hep-th/9901001")
        );
        assert_eq!(
            route_seed("W2741809807", SourceKind::Arxiv),
            target(SourceKind::OpenAlex, "W2741809807")
        );
        assert_eq!(
            route_seed("10.7717/peerj.4375", SourceKind::Arxiv),
            target(SourceKind::SemanticScholar, "DOI:10.7717/peerj.4375")
        );
        assert_eq!(
            route_seed("https://doi.org/10.7717/peerj.4375", SourceKind::Arxiv),
            target(SourceKind::SemanticScholar, "DOI:10.7717/peerj.4375")
        );
    }

    #[test]
    fn unrecognized_ids_use_fallback() {
        assert_eq!(route_seed(" X1 ", SourceKind::Arxiv), target(SourceKind::Arxiv, "X1"));
        assert_eq!(
            route_seed("unknown:abc", SourceKind::OpenAlex),
            target(SourceKind::OpenAlex, "unknown:abc")
        );
    }
}
