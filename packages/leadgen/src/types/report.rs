use std::time::Duration;

use super::{Candidate, Source};
use crate::error::SourceError;

/// How one adapter fared during a pipeline run.
#[derive(Debug)]
pub enum AdapterStatus {
    /// The adapter returned (possibly zero) records.
    Succeeded { records: usize },
    /// The adapter failed; its contribution to the run is empty.
    Failed(SourceError),
}

impl AdapterStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, AdapterStatus::Succeeded { .. })
    }
}

/// Per-adapter diagnostics for one pipeline run.
#[derive(Debug)]
pub struct AdapterOutcome {
    pub source: Source,
    pub status: AdapterStatus,
    pub elapsed: Duration,
}

/// The result of one aggregation run: the ranked candidates plus
/// per-adapter success/failure diagnostics.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Final candidates, ordered by relevance score descending.
    pub candidates: Vec<Candidate>,
    pub adapters: Vec<AdapterOutcome>,
}

impl PipelineOutcome {
    /// An outcome with no candidates and no adapter activity.
    pub fn empty() -> Self {
        Self {
            candidates: Vec::new(),
            adapters: Vec::new(),
        }
    }

    /// True when every configured adapter failed.
    pub fn all_sources_failed(&self) -> bool {
        !self.adapters.is_empty() && self.adapters.iter().all(|a| !a.status.is_success())
    }
}
