//! Campaign domain: models, persistence, recurrence, and run orchestration.

pub mod models;
pub mod orchestrator;
pub mod recurrence;
pub mod store;

pub use models::{AutoLead, Campaign, CampaignStatus, NewAutoLead};
pub use orchestrator::{CampaignOrchestrator, OrchestrationError, RunReport};
pub use recurrence::RecurrencePattern;
pub use store::{CampaignStore, MemoryCampaignStore, PostgresCampaignStore};
