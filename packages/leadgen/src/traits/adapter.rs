//! Source adapter trait for external business-data providers.
//!
//! Each adapter queries exactly one provider and fails independently of the
//! others. Rate limiting against the provider is the adapter's own
//! responsibility, not the pipeline's: the pipeline only imposes a deadline.

use async_trait::async_trait;

use crate::error::SourceResult;
use crate::types::{RawRecord, Source};

/// One external data source.
///
/// # Contract
///
/// Given a query string and a region hint, return a finite sequence of raw
/// candidate records within a bounded time, or fail with
/// [`SourceError::Unavailable`](crate::error::SourceError) /
/// [`SourceError::Timeout`](crate::error::SourceError). Zero results is a
/// valid success (`Ok(vec![])`), never an error.
///
/// # Implementations
///
/// - `DuckDuckGoAdapter` - HTML search result scraping
/// - `OpenCorporatesAdapter` - company registry API
/// - `GooglePlacesAdapter` - places text search API
/// - `MockAdapter` - for testing
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which provider this adapter queries.
    fn source(&self) -> Source;

    /// Search the provider for businesses matching the query in the region.
    async fn search(&self, query: &str, region: &str) -> SourceResult<Vec<RawRecord>>;
}
