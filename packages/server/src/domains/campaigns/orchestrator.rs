//! Campaign run orchestration.
//!
//! ```text
//!            +-----------+       +---------------------+
//!  run(id) ->| run guard |------>| AggregationPipeline |
//!            +-----------+       +---------------------+
//!                  |                        |
//!                  v                        v
//!            status: active           ranked candidates
//!                  |                        |
//!                  +-----> commit_run <-----+
//!                              |
//!               +--------------+--------------+
//!               |                             |
//!          completed (+reschedule)     rollback to prior status
//! ```
//!
//! At most one run per campaign is in flight at a time. The guard is
//! in-process; a multi-instance deployment would need an advisory lock
//! in the store instead.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use leadgen::{AggregationPipeline, GenerationRequest, PipelineOutcome};

use crate::domains::campaigns::models::{Campaign, CampaignStatus, NewAutoLead};
use crate::domains::campaigns::recurrence::RecurrencePattern;
use crate::domains::campaigns::store::CampaignStore;
use crate::kernel::traits::BaseNotifier;

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("campaign {0} not found")]
    NotFound(Uuid),
    #[error("campaign {0} already has a run in flight")]
    AlreadyRunning(Uuid),
    #[error("failed to commit run results")]
    Commit(#[source] anyhow::Error),
    #[error("campaign store error")]
    Store(#[source] anyhow::Error),
}

/// Tracks campaigns with a run in flight.
#[derive(Default)]
struct RunGuard {
    active: Mutex<HashSet<Uuid>>,
}

impl RunGuard {
    /// Claims a slot for `id`, or `None` when a run is already in flight.
    fn try_acquire(self: &Arc<Self>, id: Uuid) -> Option<RunToken> {
        let mut active = self.active.lock().unwrap();
        if active.insert(id) {
            Some(RunToken {
                guard: Arc::clone(self),
                id,
            })
        } else {
            None
        }
    }

    fn is_running(&self, id: Uuid) -> bool {
        self.active.lock().unwrap().contains(&id)
    }
}

/// Releases the claimed slot on drop, including on panic or early return.
struct RunToken {
    guard: Arc<RunGuard>,
    id: Uuid,
}

impl Drop for RunToken {
    fn drop(&mut self) {
        self.guard.active.lock().unwrap().remove(&self.id);
    }
}

/// Summary of a completed campaign run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub campaign_id: Uuid,
    pub leads_generated: i64,
    pub sources_succeeded: usize,
    pub sources_failed: usize,
    pub rescheduled: bool,
}

pub struct CampaignOrchestrator {
    store: Arc<dyn CampaignStore>,
    pipeline: Arc<AggregationPipeline>,
    notifier: Arc<dyn BaseNotifier>,
    recipients: Vec<String>,
    guard: Arc<RunGuard>,
    lead_limit: usize,
}

impl CampaignOrchestrator {
    pub fn new(
        store: Arc<dyn CampaignStore>,
        pipeline: Arc<AggregationPipeline>,
        notifier: Arc<dyn BaseNotifier>,
        recipients: Vec<String>,
        lead_limit: usize,
    ) -> Self {
        Self {
            store,
            pipeline,
            notifier,
            recipients,
            guard: Arc::new(RunGuard::default()),
            lead_limit,
        }
    }

    /// Whether a run for `id` is currently in flight.
    pub fn is_running(&self, id: Uuid) -> bool {
        self.guard.is_running(id)
    }

    /// Executes a full generation run for one campaign.
    ///
    /// The campaign is marked active for the duration. On success the
    /// leads are committed atomically and the campaign lands in
    /// `completed` (then back to `scheduled` when it recurs). On commit
    /// failure no leads are persisted and the campaign is rolled back to
    /// its pre-run status, except that an Active claim is released to
    /// `scheduled` so the campaign never strands outside the scheduler's
    /// view.
    pub async fn run(&self, id: Uuid) -> Result<RunReport, OrchestrationError> {
        let _token = self
            .guard
            .try_acquire(id)
            .ok_or(OrchestrationError::AlreadyRunning(id))?;

        let campaign = self
            .store
            .find_by_id(id)
            .await
            .map_err(OrchestrationError::Store)?
            .ok_or(OrchestrationError::NotFound(id))?;

        // Active means the scheduler (or a retried job) already claimed the
        // campaign; rolling back to Active would strand it outside the
        // scheduler's view forever, so the rollback target is Scheduled.
        let pre_run_status = match campaign.status {
            CampaignStatus::Active => CampaignStatus::Scheduled,
            other => other,
        };
        self.store
            .set_status(id, CampaignStatus::Active)
            .await
            .map_err(OrchestrationError::Store)?;

        let started = Instant::now();
        let request = GenerationRequest::new(campaign.keywords.clone(), campaign.region.clone())
            .with_limit(self.lead_limit);
        let outcome = self.pipeline.run(&request).await;

        if outcome.all_sources_failed() && !outcome.adapters.is_empty() {
            warn!(
                campaign_id = %id,
                "every source failed; committing an empty run"
            );
        }

        let leads: Vec<NewAutoLead> = outcome
            .candidates
            .iter()
            .map(|candidate| NewAutoLead::from_candidate(id, candidate))
            .collect();

        let committed = match self.store.commit_run(id, &leads).await {
            Ok(count) => count,
            Err(err) => {
                error!(
                    campaign_id = %id,
                    error = %err,
                    "commit failed; rolling back campaign status"
                );
                if let Err(rollback_err) = self.store.set_status(id, pre_run_status).await {
                    error!(
                        campaign_id = %id,
                        error = %rollback_err,
                        "status rollback failed"
                    );
                }
                return Err(OrchestrationError::Commit(err));
            }
        };

        let rescheduled = self.maybe_reschedule(&campaign).await?;

        info!(
            campaign_id = %id,
            leads = committed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            rescheduled,
            "campaign run completed"
        );

        self.notify_completion(&campaign, committed);

        Ok(RunReport {
            campaign_id: id,
            leads_generated: committed,
            sources_succeeded: Self::succeeded(&outcome),
            sources_failed: outcome.adapters.len() - Self::succeeded(&outcome),
            rescheduled,
        })
    }

    fn succeeded(outcome: &PipelineOutcome) -> usize {
        outcome
            .adapters
            .iter()
            .filter(|a| a.status.is_success())
            .count()
    }

    /// Pushes a recurring campaign back into `scheduled` with its next
    /// occurrence. Unknown patterns leave the campaign completed.
    async fn maybe_reschedule(&self, campaign: &Campaign) -> Result<bool, OrchestrationError> {
        let Some(raw) = campaign.recurrence.as_deref() else {
            return Ok(false);
        };
        let Some(pattern) = RecurrencePattern::parse(raw) else {
            warn!(campaign_id = %campaign.id, pattern = raw, "unknown recurrence pattern; not rescheduling");
            return Ok(false);
        };

        let next_at = pattern.next_occurrence(Utc::now());
        self.store
            .reschedule(campaign.id, next_at)
            .await
            .map_err(OrchestrationError::Store)?;
        Ok(true)
    }

    /// Fire-and-forget completion notice.
    fn notify_completion(&self, campaign: &Campaign, leads_generated: i64) {
        if self.recipients.is_empty() {
            return;
        }
        let notifier = Arc::clone(&self.notifier);
        let recipients = self.recipients.clone();
        let campaign_id = campaign.id;
        let campaign_name = campaign.name.clone();
        tokio::spawn(async move {
            if let Err(err) = notifier
                .campaign_completed(campaign_id, &campaign_name, leads_generated, &recipients)
                .await
            {
                warn!(campaign_id = %campaign_id, error = %err, "completion notification failed");
            }
        });
    }
}
