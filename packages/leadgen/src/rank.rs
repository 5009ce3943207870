//! Ranking: stable sort by relevance score descending, then truncate.

use crate::types::Candidate;

/// Default result limit when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 20;

/// Sort candidates by score descending and keep the top `limit`.
///
/// The sort is stable: equal-score candidates retain their post-dedup
/// relative order. A limit of 0 is valid and yields an empty result.
pub fn rank(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;
    use serde_json::json;

    fn candidate(name: &str, score: f64) -> Candidate {
        let mut c = Candidate::new(name, Source::DuckDuckGo, json!({}));
        c.relevance_score = score;
        c
    }

    #[test]
    fn test_sorted_descending() {
        let out = rank(
            vec![candidate("a", 0.2), candidate("b", 0.9), candidate("c", 0.5)],
            10,
        );
        let names: Vec<_> = out.iter().map(|c| c.company_name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_stable_for_equal_scores() {
        let out = rank(
            vec![
                candidate("first", 0.5),
                candidate("second", 0.5),
                candidate("third", 0.5),
            ],
            10,
        );
        let names: Vec<_> = out.iter().map(|c| c.company_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let out = rank(
            vec![candidate("a", 0.1), candidate("b", 0.2), candidate("c", 0.3)],
            2,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].company_name, "c");
    }

    #[test]
    fn test_limit_zero_is_empty() {
        let out = rank(vec![candidate("a", 0.9)], 0);
        assert!(out.is_empty());
    }
}
