// Lead Aggregation & Campaign Orchestration Engine - API Core
//
// This crate provides the backend for keyword-driven lead generation
// campaigns: the campaign domain and its orchestrator, the in-process job
// queue, the scheduler, and a thin HTTP surface for triggering runs.
// The aggregation pipeline itself lives in the `leadgen` library.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
