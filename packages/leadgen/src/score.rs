//! Relevance scoring: lexical keyword matching plus semantic similarity.
//!
//! Final score = lexical (weight 0.6) + semantic (weight 0.4), clamped to
//! `[0, 1]`. The semantic component needs an embedder; when none is
//! configured or a call fails, scoring degrades to lexical-only.

use tracing::debug;

use crate::traits::{cosine_similarity, Embedder};
use crate::types::Candidate;

/// Weight of the keyword-substring component.
pub const LEXICAL_WEIGHT: f64 = 0.6;

/// Weight of the embedding-similarity component.
pub const SEMANTIC_WEIGHT: f64 = 0.4;

/// Outcome of scoring one candidate against a keyword set.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    /// Combined relevance score in `[0.0, 1.0]`.
    pub score: f64,
    /// Keywords whose lexical substring test succeeded. Always a subset of
    /// the input keywords, independent of the semantic component.
    pub matched_keywords: Vec<String>,
}

impl Scored {
    fn zero() -> Self {
        Self {
            score: 0.0,
            matched_keywords: Vec::new(),
        }
    }
}

/// Score a candidate against a keyword set.
///
/// An empty keyword set scores 0.0 with no matches, unconditionally.
pub async fn score(
    candidate: &Candidate,
    keywords: &[String],
    embedder: Option<&dyn Embedder>,
) -> Scored {
    if keywords.is_empty() {
        return Scored::zero();
    }

    let text = candidate.scoring_text();
    if text.is_empty() {
        return Scored::zero();
    }

    let matched_keywords: Vec<String> = keywords
        .iter()
        .filter(|k| text.contains(&k.to_lowercase()))
        .cloned()
        .collect();

    let lexical =
        (matched_keywords.len() as f64 / keywords.len() as f64).min(1.0) * LEXICAL_WEIGHT;

    let semantic = match embedder {
        Some(embedder) => semantic_component(embedder, &text, keywords).await,
        None => 0.0,
    };

    Scored {
        score: (lexical + semantic).clamp(0.0, 1.0),
        matched_keywords,
    }
}

/// Semantic similarity between the candidate text and the joined keyword
/// phrase. Embedding failures contribute 0 (lexical-only degradation).
async fn semantic_component(embedder: &dyn Embedder, text: &str, keywords: &[String]) -> f64 {
    let phrase = keywords.join(" ");

    let text_vec = match embedder.embed(text).await {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "embedding unavailable, lexical-only scoring");
            return 0.0;
        }
    };
    let phrase_vec = match embedder.embed(&phrase).await {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "embedding unavailable, lexical-only scoring");
            return 0.0;
        }
    };

    // Negative similarity contributes nothing
    cosine_similarity(&text_vec, &phrase_vec).max(0.0) * SEMANTIC_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockEmbedder;
    use crate::types::Source;
    use proptest::prelude::*;
    use serde_json::json;

    fn candidate(name: &str, industry: Option<&str>, description: Option<&str>) -> Candidate {
        let mut c = Candidate::new(name, Source::DuckDuckGo, json!({}));
        c.industry = industry.map(str::to_string);
        c.description = description.map(str::to_string);
        c
    }

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_keywords_score_zero() {
        let c = candidate("Acme Cloud", Some("Software"), None);
        let scored = score(&c, &[], None).await;
        assert_eq!(scored.score, 0.0);
        assert!(scored.matched_keywords.is_empty());
    }

    #[tokio::test]
    async fn test_all_keywords_matched_lexical_only() {
        let c = candidate("Acme Cloud Security", None, None);
        let scored = score(&c, &kw(&["cloud", "security"]), None).await;
        assert!((scored.score - LEXICAL_WEIGHT).abs() < 1e-9);
        assert_eq!(scored.matched_keywords, kw(&["cloud", "security"]));
    }

    #[tokio::test]
    async fn test_partial_match_fraction() {
        let c = candidate("Acme Cloud", None, None);
        let scored = score(&c, &kw(&["cloud", "security"]), None).await;
        assert!((scored.score - 0.3).abs() < 1e-9);
        assert_eq!(scored.matched_keywords, kw(&["cloud"]));
    }

    #[tokio::test]
    async fn test_match_is_case_insensitive_across_fields() {
        let c = candidate("Acme", Some("HEALTHCARE"), Some("Consulting for clinics"));
        let scored = score(&c, &kw(&["healthcare", "consulting"]), None).await;
        assert_eq!(scored.matched_keywords.len(), 2);
    }

    #[tokio::test]
    async fn test_semantic_component_added() {
        let c = candidate("Acme Cloud Security", None, None);
        let embedder = MockEmbedder::new().with_default(vec![1.0, 0.0]);
        // Identical default vectors => cosine 1.0 => semantic = 0.4
        let scored = score(&c, &kw(&["cloud", "security"]), Some(&embedder)).await;
        assert!((scored.score - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_negative_similarity_floored() {
        let c = candidate("Acme Cloud", None, None);
        let embedder = MockEmbedder::new()
            .with_vector("acme cloud", vec![1.0, 0.0])
            .with_vector("cloud", vec![-1.0, 0.0]);
        let scored = score(&c, &kw(&["cloud"]), Some(&embedder)).await;
        // Lexical 0.6 only; negative cosine contributes nothing
        assert!((scored.score - LEXICAL_WEIGHT).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_embedder_failure_degrades_to_lexical() {
        let c = candidate("Acme Cloud", None, None);
        let embedder = MockEmbedder::new(); // no vectors, every call fails
        let scored = score(&c, &kw(&["cloud"]), Some(&embedder)).await;
        assert!((scored.score - LEXICAL_WEIGHT).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_matched_keywords_subset_of_input() {
        let c = candidate("Acme Cloud", None, None);
        let keywords = kw(&["cloud", "security", "fintech"]);
        let scored = score(&c, &keywords, None).await;
        assert!(scored.matched_keywords.iter().all(|k| keywords.contains(k)));
    }

    proptest! {
        #[test]
        fn prop_score_always_in_unit_interval(
            name in ".{0,40}",
            description in ".{0,80}",
            keywords in proptest::collection::vec("[a-z]{1,10}", 0..8),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let c = candidate(&name, None, Some(&description));
            let scored = rt.block_on(score(&c, &keywords, None));
            prop_assert!((0.0..=1.0).contains(&scored.score));
            prop_assert!(scored.matched_keywords.iter().all(|k| keywords.contains(k)));
        }
    }
}
