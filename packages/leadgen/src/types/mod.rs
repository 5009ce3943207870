//! Core types shared across the aggregation pipeline.

mod candidate;
mod record;
mod report;
mod source;

pub use candidate::Candidate;
pub use record::RawRecord;
pub use report::{AdapterOutcome, AdapterStatus, PipelineOutcome};
pub use source::Source;
