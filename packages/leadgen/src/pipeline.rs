//! The aggregation pipeline: adapters → extract → score → dedup → rank.
//!
//! ```text
//! GenerationRequest (keywords, region, limit)
//!     │
//!     ├─► fan out to all adapters concurrently (per-adapter deadline)
//!     │       └─► each failure isolated; the run continues with the rest
//!     ├─► extract: raw records → canonical candidates (invalids discarded)
//!     ├─► score: lexical + semantic relevance per candidate
//!     ├─► dedup: collapse on normalized company identity
//!     └─► rank: stable sort by score, truncate to limit
//! ```
//!
//! If every adapter fails the run yields an empty outcome, not an error:
//! total source exhaustion is zero leads, never a pipeline failure.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::dedup::dedup;
use crate::error::SourceError;
use crate::extract::extract;
use crate::rank::{rank, DEFAULT_LIMIT};
use crate::score::score;
use crate::traits::{Embedder, SourceAdapter};
use crate::types::{AdapterOutcome, AdapterStatus, Candidate, PipelineOutcome, RawRecord};

/// Keywords used when building the provider query; longer keyword sets do
/// not further lengthen the query (provider query-length limits).
const QUERY_KEYWORD_CAP: usize = 3;

/// One generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Ordered keyword set; order affects query construction.
    pub keywords: Vec<String>,
    pub region: String,
    pub limit: usize,
}

impl GenerationRequest {
    pub fn new(keywords: Vec<String>, region: impl Into<String>) -> Self {
        Self {
            keywords,
            region: region.into(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Orchestrates one generation request across the configured adapters.
///
/// Adapter list order defines source priority for dedup tie-breaks.
pub struct AggregationPipeline {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    embedder: Option<Arc<dyn Embedder>>,
    per_adapter_timeout: Duration,
}

impl AggregationPipeline {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self {
            adapters,
            embedder: None,
            per_adapter_timeout: Duration::from_secs(15),
        }
    }

    /// Attach the semantic-similarity collaborator.
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Deadline applied to each adapter individually.
    pub fn with_per_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.per_adapter_timeout = timeout;
        self
    }

    /// Build the provider query from at most the first three keywords.
    fn build_query(keywords: &[String]) -> String {
        keywords
            .iter()
            .take(QUERY_KEYWORD_CAP)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the full pipeline for one request.
    pub async fn run(&self, request: &GenerationRequest) -> PipelineOutcome {
        let query = Self::build_query(&request.keywords);
        if query.is_empty() {
            debug!("empty keyword set, skipping source fan-out");
            return PipelineOutcome::empty();
        }

        // 1. Concurrent fan-out, each adapter under its own deadline. The
        // pipeline blocks until every adapter returned or timed out; once
        // dispatched there is no mid-flight abort.
        let fetches = self.adapters.iter().map(|adapter| {
            let query = query.clone();
            let region = request.region.clone();
            let deadline = self.per_adapter_timeout;
            async move {
                let started = Instant::now();
                let result =
                    tokio::time::timeout(deadline, adapter.search(&query, &region)).await;
                let elapsed = started.elapsed();

                let status = match result {
                    Ok(Ok(records)) => {
                        debug!(source = %adapter.source(), count = records.len(), "adapter succeeded");
                        return (
                            AdapterOutcome {
                                source: adapter.source(),
                                status: AdapterStatus::Succeeded {
                                    records: records.len(),
                                },
                                elapsed,
                            },
                            records,
                        );
                    }
                    Ok(Err(e)) => {
                        warn!(source = %adapter.source(), error = %e, "adapter failed");
                        AdapterStatus::Failed(e)
                    }
                    Err(_) => {
                        warn!(source = %adapter.source(), "adapter deadline exceeded");
                        AdapterStatus::Failed(SourceError::Timeout {
                            provider: adapter.source(),
                        })
                    }
                };

                (
                    AdapterOutcome {
                        source: adapter.source(),
                        status,
                        elapsed,
                    },
                    Vec::new(),
                )
            }
        });

        let mut outcomes = Vec::with_capacity(self.adapters.len());
        let mut raw_records: Vec<RawRecord> = Vec::new();
        for (outcome, records) in join_all(fetches).await {
            outcomes.push(outcome);
            raw_records.extend(records);
        }

        // 2-3. Extract and score; records stay in adapter (priority) order
        let mut candidates: Vec<Candidate> = Vec::with_capacity(raw_records.len());
        for record in raw_records {
            let Some(mut candidate) = extract(record) else {
                continue;
            };
            let scored = score(
                &candidate,
                &request.keywords,
                self.embedder.as_deref(),
            )
            .await;
            candidate.relevance_score = scored.score;
            candidate.matched_keywords = scored.matched_keywords;
            candidates.push(candidate);
        }

        // 4-5. Dedup, then rank and truncate
        let survivors = dedup(candidates);
        let ranked = rank(survivors, request.limit);

        info!(
            candidates = ranked.len(),
            sources_ok = outcomes.iter().filter(|o| o.status.is_success()).count(),
            sources_total = outcomes.len(),
            "aggregation run complete"
        );

        PipelineOutcome {
            candidates: ranked,
            adapters: outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockAdapter;
    use crate::traits::MockEmbedder;
    use crate::types::Source;

    fn request(keywords: &[&str]) -> GenerationRequest {
        GenerationRequest::new(
            keywords.iter().map(|k| k.to_string()).collect(),
            "India",
        )
    }

    #[test]
    fn test_query_capped_at_three_keywords() {
        let q = AggregationPipeline::build_query(&[
            "cloud".into(),
            "security".into(),
            "saas".into(),
            "fintech".into(),
        ]);
        assert_eq!(q, "cloud security saas");
    }

    #[tokio::test]
    async fn test_empty_keywords_yield_empty_outcome() {
        let adapter = Arc::new(MockAdapter::new(Source::DuckDuckGo).with_records(vec![
            MockAdapter::search_hit(Source::DuckDuckGo, "Acme", "cloud", ""),
        ]));
        let pipeline = AggregationPipeline::new(vec![adapter.clone()]);

        let outcome = pipeline.run(&request(&[])).await;
        assert!(outcome.candidates.is_empty());
        assert!(outcome.adapters.is_empty());
        assert!(adapter.calls().is_empty());
    }

    #[tokio::test]
    async fn test_single_adapter_happy_path() {
        let adapter = Arc::new(MockAdapter::new(Source::DuckDuckGo).with_records(vec![
            MockAdapter::search_hit(
                Source::DuckDuckGo,
                "Acme Cloud Security - Home",
                "cloud security software",
                "https://acme.example.com",
            ),
        ]));
        let pipeline = AggregationPipeline::new(vec![adapter.clone()]);

        let outcome = pipeline.run(&request(&["cloud", "security"])).await;
        assert_eq!(outcome.candidates.len(), 1);
        let c = &outcome.candidates[0];
        assert_eq!(c.company_name, "Acme Cloud Security");
        assert_eq!(c.matched_keywords, vec!["cloud", "security"]);
        assert!(c.relevance_score > 0.0);

        // Region hint is forwarded to the adapter
        assert_eq!(adapter.calls(), vec![("cloud security".to_string(), "India".to_string())]);
    }

    #[tokio::test]
    async fn test_failed_adapter_is_isolated() {
        let good = Arc::new(MockAdapter::new(Source::DuckDuckGo).with_records(vec![
            MockAdapter::search_hit(Source::DuckDuckGo, "Acme Cloud", "cloud", ""),
        ]));
        let bad = Arc::new(MockAdapter::new(Source::OpenCorporates).with_unavailable("HTTP 503"));
        let pipeline = AggregationPipeline::new(vec![good, bad]);

        let outcome = pipeline.run(&request(&["cloud"])).await;
        assert_eq!(outcome.candidates.len(), 1);
        assert!(!outcome.all_sources_failed());
        assert_eq!(outcome.adapters.len(), 2);
        assert!(outcome.adapters[0].status.is_success());
        assert!(!outcome.adapters[1].status.is_success());
    }

    #[tokio::test]
    async fn test_all_adapters_failed_is_empty_not_error() {
        let a = Arc::new(MockAdapter::new(Source::DuckDuckGo).with_unavailable("down"));
        let b = Arc::new(MockAdapter::new(Source::GooglePlaces).with_timeout());
        let pipeline = AggregationPipeline::new(vec![a, b]);

        let outcome = pipeline.run(&request(&["cloud"])).await;
        assert!(outcome.candidates.is_empty());
        assert!(outcome.all_sources_failed());
    }

    #[tokio::test]
    async fn test_slow_adapter_hits_deadline() {
        let hung = Arc::new(MockAdapter::new(Source::OpenCorporates).with_hang());
        let good = Arc::new(MockAdapter::new(Source::DuckDuckGo).with_records(vec![
            MockAdapter::search_hit(Source::DuckDuckGo, "Acme Cloud", "cloud", ""),
        ]));
        let pipeline = AggregationPipeline::new(vec![hung, good])
            .with_per_adapter_timeout(Duration::from_millis(50));

        let outcome = pipeline.run(&request(&["cloud"])).await;
        assert_eq!(outcome.candidates.len(), 1);
        match &outcome.adapters[0].status {
            AdapterStatus::Failed(SourceError::Timeout { provider }) => {
                assert_eq!(*provider, Source::OpenCorporates);
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cross_source_dedup_keeps_higher_scored_spelling() {
        // Adapter A has a description matching both keywords; adapter B's
        // lexical-only score is lower, so A's spelling must survive.
        let a = Arc::new(MockAdapter::new(Source::DuckDuckGo).with_records(vec![
            MockAdapter::search_hit(
                Source::DuckDuckGo,
                "Acme Cloud Security Pvt Ltd",
                "cloud security software",
                "https://acme.example.com",
            ),
        ]));
        let b = Arc::new(MockAdapter::new(Source::OpenCorporates).with_records(vec![
            RawRecord::RegistryEntry {
                source: Source::OpenCorporates,
                name: "acme cloud security pvt ltd".to_string(),
                company_type: None,
                address: None,
                raw: serde_json::json!({}),
            },
        ]));
        let pipeline = AggregationPipeline::new(vec![a, b]);

        let outcome = pipeline.run(&request(&["cloud", "security"])).await;
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].company_name, "Acme Cloud Security Pvt Ltd");
        assert_eq!(
            outcome.candidates[0].matched_keywords,
            vec!["cloud", "security"]
        );
    }

    #[tokio::test]
    async fn test_limit_zero_yields_no_candidates() {
        let adapter = Arc::new(MockAdapter::new(Source::DuckDuckGo).with_records(vec![
            MockAdapter::search_hit(Source::DuckDuckGo, "Acme Cloud", "cloud", ""),
        ]));
        let pipeline = AggregationPipeline::new(vec![adapter]);

        let outcome = pipeline.run(&request(&["cloud"]).with_limit(0)).await;
        assert!(outcome.candidates.is_empty());
        // The adapter still ran; truncation happened at the ranker
        assert!(outcome.adapters[0].status.is_success());
    }

    #[tokio::test]
    async fn test_embedder_raises_scores() {
        let adapter = Arc::new(MockAdapter::new(Source::DuckDuckGo).with_records(vec![
            MockAdapter::search_hit(Source::DuckDuckGo, "Acme Cloud", "cloud platforms", ""),
        ]));
        let embedder = Arc::new(MockEmbedder::new().with_default(vec![0.5, 0.5]));

        let lexical_only = AggregationPipeline::new(vec![adapter.clone()]);
        let with_semantic =
            AggregationPipeline::new(vec![adapter]).with_embedder(embedder);

        let base = lexical_only.run(&request(&["cloud"])).await;
        let boosted = with_semantic.run(&request(&["cloud"])).await;
        assert!(
            boosted.candidates[0].relevance_score > base.candidates[0].relevance_score
        );
    }
}
