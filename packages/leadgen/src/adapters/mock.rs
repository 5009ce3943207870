//! Mock source adapter for testing.
//!
//! Allows configuring canned records or a canned failure, and records the
//! queries it received for verification.

use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use crate::error::{SourceError, SourceResult};
use crate::traits::SourceAdapter;
use crate::types::{RawRecord, Source};

enum CannedResponse {
    Records(Vec<RawRecord>),
    Unavailable(String),
    Timeout,
    /// Never resolves; exercises the pipeline's per-adapter deadline.
    Hang,
}

/// Mock adapter with canned responses.
pub struct MockAdapter {
    source: Source,
    response: RwLock<CannedResponse>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAdapter {
    /// Create a mock that returns no records.
    pub fn new(source: Source) -> Self {
        Self {
            source,
            response: RwLock::new(CannedResponse::Records(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return these records on every search (builder pattern).
    pub fn with_records(self, records: Vec<RawRecord>) -> Self {
        *self.response.write().unwrap() = CannedResponse::Records(records);
        self
    }

    /// Fail every search with `Unavailable`.
    pub fn with_unavailable(self, reason: &str) -> Self {
        *self.response.write().unwrap() = CannedResponse::Unavailable(reason.to_string());
        self
    }

    /// Fail every search with `Timeout`.
    pub fn with_timeout(self) -> Self {
        *self.response.write().unwrap() = CannedResponse::Timeout;
        self
    }

    /// Never return; the caller's deadline has to fire.
    pub fn with_hang(self) -> Self {
        *self.response.write().unwrap() = CannedResponse::Hang;
        self
    }

    /// The `(query, region)` pairs this adapter was called with.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Convenience: a search hit record for this mock's source.
    pub fn search_hit(source: Source, title: &str, snippet: &str, url: &str) -> RawRecord {
        RawRecord::SearchHit {
            source,
            title: title.to_string(),
            snippet: snippet.to_string(),
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl SourceAdapter for MockAdapter {
    fn source(&self) -> Source {
        self.source
    }

    async fn search(&self, query: &str, region: &str) -> SourceResult<Vec<RawRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), region.to_string()));

        // Resolve the canned response before any await so the lock
        // guard never crosses a suspension point.
        let canned = {
            let response = self.response.read().unwrap();
            match &*response {
                CannedResponse::Records(records) => Some(Ok(records.clone())),
                CannedResponse::Unavailable(reason) => Some(Err(SourceError::Unavailable {
                    provider: self.source,
                    reason: reason.clone(),
                })),
                CannedResponse::Timeout => Some(Err(SourceError::Timeout {
                    provider: self.source,
                })),
                CannedResponse::Hang => None,
            }
        };

        match canned {
            Some(result) => result,
            None => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}
