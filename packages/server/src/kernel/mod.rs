//! Cross-cutting services: dependency wiring, jobs, scheduling,
//! notifications, and the embedding client.

pub mod deps;
pub mod embedding;
pub mod jobs;
pub mod notify;
pub mod scheduler;
pub mod traits;

pub use deps::ServerDeps;
