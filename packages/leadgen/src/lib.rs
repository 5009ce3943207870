//! Lead Aggregation Library
//!
//! Queries several independent business-data providers concurrently,
//! normalizes their differently shaped records into canonical candidates,
//! scores relevance against a keyword set (lexical + semantic),
//! deduplicates across sources and ranks the survivors.
//!
//! # Design
//!
//! - Pluggable sources behind [`SourceAdapter`]; each fails independently
//!   and owns its own rate limiting
//! - Partial-failure tolerant: the pipeline runs with whatever sources
//!   succeeded, and total source exhaustion is an empty result, not an error
//! - Semantic scoring degrades gracefully when no [`Embedder`] is configured
//! - Library handles aggregation mechanics; the app owns campaigns,
//!   persistence and scheduling
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use leadgen::{AggregationPipeline, DuckDuckGoAdapter, GenerationRequest};
//!
//! let pipeline = AggregationPipeline::new(vec![Arc::new(DuckDuckGoAdapter::new())]);
//! let request = GenerationRequest::new(vec!["cloud".into(), "security".into()], "India");
//! let outcome = pipeline.run(&request).await;
//!
//! for candidate in outcome.candidates {
//!     println!("{} ({:.2})", candidate.company_name, candidate.relevance_score);
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (SourceAdapter, Embedder)
//! - [`types`] - Candidate and diagnostic types
//! - [`adapters`] - Provider implementations (DuckDuckGo, OpenCorporates, Places)
//! - [`pipeline`] - The aggregation pipeline
//! - [`extract`], [`score`], [`dedup`], [`rank`] - The individual stages

pub mod adapters;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod rank;
pub mod score;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use adapters::{DuckDuckGoAdapter, GooglePlacesAdapter, MockAdapter, OpenCorporatesAdapter};
pub use error::{EmbedError, SourceError};
pub use pipeline::{AggregationPipeline, GenerationRequest};
pub use rank::DEFAULT_LIMIT;
pub use score::{score, Scored};
pub use traits::{cosine_similarity, Embedder, MockEmbedder, SourceAdapter};
pub use types::{AdapterOutcome, AdapterStatus, Candidate, PipelineOutcome, RawRecord, Source};
