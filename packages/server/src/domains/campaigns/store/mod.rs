//! Campaign persistence behind a trait, so the orchestrator, scheduler and
//! queue can be exercised against an in-memory store.

mod memory;
mod postgres;

pub use memory::MemoryCampaignStore;
pub use postgres::PostgresCampaignStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::{Campaign, CampaignStatus, NewAutoLead};

/// Storage operations the engine needs from the persistence layer.
///
/// `commit_run` is the atomicity boundary: the lead batch, the
/// `leads_generated` counter and the Completed status land in one
/// transaction, or none of them do.
#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Campaign>>;

    /// Campaigns with status Scheduled whose `scheduled_at` is due.
    async fn find_due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<Campaign>>;

    async fn set_status(&self, id: Uuid, status: CampaignStatus) -> Result<()>;

    /// Commit one generation run: insert the lead batch, set
    /// `leads_generated` to the batch size and the status to Completed,
    /// all-or-nothing. Returns the committed count.
    async fn commit_run(&self, id: Uuid, leads: &[NewAutoLead]) -> Result<i64>;

    /// Recurrence reset: Completed → Scheduled at the next occurrence.
    async fn reschedule(&self, id: Uuid, next_at: DateTime<Utc>) -> Result<()>;

    /// Number of persisted leads for a campaign (diagnostics and tests).
    async fn count_leads(&self, id: Uuid) -> Result<i64>;
}
