//! Cross-source deduplication on normalized company identity.
//!
//! Identity key: lower-cased, whitespace-collapsed company name. Within a
//! key group exactly one candidate survives — the highest-scored one, ties
//! keeping the earlier candidate in input order (input order is source
//! priority order). Losers are dropped silently.

use std::collections::HashMap;

use crate::types::Candidate;

/// Normalized identity key used to detect duplicates across sources.
pub fn identity_key(company_name: &str) -> String {
    company_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Collapse duplicates, keeping the best instance per identity key.
///
/// Output preserves the first-seen order of surviving keys, so running the
/// deduplicator on its own output is a no-op.
pub fn dedup(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut by_key: HashMap<String, usize> = HashMap::new();
    let mut survivors: Vec<Candidate> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = identity_key(&candidate.company_name);
        match by_key.get(&key) {
            None => {
                by_key.insert(key, survivors.len());
                survivors.push(candidate);
            }
            Some(&idx) => {
                // Strictly greater only: a tie keeps the earlier candidate
                if candidate.relevance_score > survivors[idx].relevance_score {
                    survivors[idx] = candidate;
                }
            }
        }
    }

    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;
    use serde_json::json;

    fn candidate(name: &str, source: Source, score: f64) -> Candidate {
        let mut c = Candidate::new(name, source, json!({}));
        c.relevance_score = score;
        c
    }

    #[test]
    fn test_identity_key_normalizes_case_and_whitespace() {
        assert_eq!(
            identity_key("  Acme   Cloud\tSecurity "),
            "acme cloud security"
        );
        assert_eq!(
            identity_key("ACME Cloud Security"),
            identity_key("acme cloud security")
        );
    }

    #[test]
    fn test_highest_score_survives() {
        let out = dedup(vec![
            candidate("Acme Cloud Security Pvt Ltd", Source::DuckDuckGo, 0.9),
            candidate("acme cloud security pvt ltd", Source::OpenCorporates, 0.5),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].company_name, "Acme Cloud Security Pvt Ltd");
        assert_eq!(out[0].source, Source::DuckDuckGo);
    }

    #[test]
    fn test_later_higher_score_replaces_earlier() {
        let out = dedup(vec![
            candidate("Acme", Source::DuckDuckGo, 0.3),
            candidate("ACME", Source::GooglePlaces, 0.7),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source, Source::GooglePlaces);
    }

    #[test]
    fn test_tie_keeps_first_seen_source() {
        let out = dedup(vec![
            candidate("Acme", Source::DuckDuckGo, 0.5),
            candidate("acme", Source::OpenCorporates, 0.5),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source, Source::DuckDuckGo);
    }

    #[test]
    fn test_distinct_names_untouched() {
        let out = dedup(vec![
            candidate("Acme", Source::DuckDuckGo, 0.5),
            candidate("Globex", Source::DuckDuckGo, 0.4),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].company_name, "Acme");
        assert_eq!(out[1].company_name, "Globex");
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            candidate("Acme", Source::DuckDuckGo, 0.5),
            candidate("acme", Source::OpenCorporates, 0.8),
            candidate("Globex", Source::GooglePlaces, 0.4),
        ];
        let once = dedup(input);
        let names_once: Vec<_> = once.iter().map(|c| c.company_name.clone()).collect();
        let twice = dedup(once);
        let names_twice: Vec<_> = twice.iter().map(|c| c.company_name.clone()).collect();
        assert_eq!(names_once, names_twice);
    }
}
