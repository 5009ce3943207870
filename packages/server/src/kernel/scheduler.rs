//! Scheduled campaign dispatch.
//!
//! Polls the store for campaigns whose `scheduled_at` has passed and
//! hands each to the job queue. The status flips to `active` before the
//! job is submitted so the next poll cannot pick the same campaign up
//! again, even if the run has not started yet.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, error, info};

use crate::domains::campaigns::models::CampaignStatus;
use crate::domains::campaigns::store::CampaignStore;
use crate::kernel::jobs::JobQueue;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub poll_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
        }
    }
}

pub struct CampaignScheduler {
    store: Arc<dyn CampaignStore>,
    queue: Arc<dyn JobQueue>,
    config: SchedulerConfig,
    shutdown: AtomicBool,
}

impl CampaignScheduler {
    pub fn new(
        store: Arc<dyn CampaignStore>,
        queue: Arc<dyn JobQueue>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            queue,
            config,
            shutdown: AtomicBool::new(false),
        }
    }

    /// Signals the poll loop to exit after its current tick.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// One poll pass: dispatches every due campaign. Returns how many
    /// were submitted.
    pub async fn tick(&self) -> Result<usize> {
        let due = self.store.find_due_scheduled(Utc::now()).await?;
        if due.is_empty() {
            return Ok(0);
        }

        let mut submitted = 0;
        for campaign in due {
            // Claim before submitting so a slow queue cannot leave the
            // campaign due for the next tick.
            if let Err(err) = self
                .store
                .set_status(campaign.id, CampaignStatus::Active)
                .await
            {
                error!(campaign_id = %campaign.id, error = %err, "failed to claim due campaign");
                continue;
            }

            match self.queue.submit(campaign.id).await {
                Ok(_) => {
                    info!(
                        campaign_id = %campaign.id,
                        name = %campaign.name,
                        "dispatched scheduled campaign"
                    );
                    submitted += 1;
                }
                Err(err) => {
                    error!(campaign_id = %campaign.id, error = %err, "failed to queue due campaign");
                    // Put it back so a later tick can retry.
                    if let Err(err) = self
                        .store
                        .set_status(campaign.id, CampaignStatus::Scheduled)
                        .await
                    {
                        error!(campaign_id = %campaign.id, error = %err, "failed to release claim");
                    }
                }
            }
        }
        Ok(submitted)
    }

    /// Poll loop. Runs until a shutdown is requested; a tick that takes
    /// longer than the interval just delays the next one.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(
            poll_secs = self.config.poll_interval.as_secs(),
            "campaign scheduler started"
        );
        loop {
            interval.tick().await;
            if self.shutdown.load(Ordering::SeqCst) {
                debug!("campaign scheduler stopping");
                break;
            }
            if let Err(err) = self.tick().await {
                error!(error = %err, "scheduler tick failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::domains::campaigns::models::Campaign;
    use crate::domains::campaigns::store::MemoryCampaignStore;
    use crate::kernel::jobs::SubmitOutcome;

    /// Records submissions instead of running anything.
    #[derive(Default)]
    struct RecordingQueue {
        submissions: Mutex<Vec<Uuid>>,
    }

    impl RecordingQueue {
        fn submissions(&self) -> Vec<Uuid> {
            self.submissions.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JobQueue for RecordingQueue {
        async fn submit(&self, campaign_id: Uuid) -> Result<SubmitOutcome> {
            self.submissions.lock().unwrap().push(campaign_id);
            Ok(SubmitOutcome::Accepted(Uuid::new_v4()))
        }
    }

    fn scheduler_with(
        store: Arc<MemoryCampaignStore>,
        queue: Arc<RecordingQueue>,
    ) -> CampaignScheduler {
        CampaignScheduler::new(store, queue, SchedulerConfig::default())
    }

    fn campaign_due_at(offset: ChronoDuration) -> Campaign {
        Campaign::new_scheduled(
            "Outreach",
            vec!["software".to_string()],
            "Minnesota",
            Some(Utc::now() + offset),
        )
    }

    #[tokio::test]
    async fn due_campaign_is_claimed_and_submitted_once() {
        let store = Arc::new(MemoryCampaignStore::new());
        let campaign = campaign_due_at(ChronoDuration::minutes(-5));
        let id = campaign.id;
        store.insert_campaign(campaign);

        let queue = Arc::new(RecordingQueue::default());
        let scheduler = scheduler_with(Arc::clone(&store), Arc::clone(&queue));

        assert_eq!(scheduler.tick().await.unwrap(), 1);
        assert_eq!(queue.submissions(), vec![id]);
        assert_eq!(store.status_of(id), Some(CampaignStatus::Active));

        // Claimed: a second tick must not re-dispatch.
        assert_eq!(scheduler.tick().await.unwrap(), 0);
        assert_eq!(queue.submissions().len(), 1);
    }

    #[tokio::test]
    async fn future_campaign_is_left_alone() {
        let store = Arc::new(MemoryCampaignStore::new());
        let campaign = campaign_due_at(ChronoDuration::hours(2));
        let id = campaign.id;
        store.insert_campaign(campaign);

        let queue = Arc::new(RecordingQueue::default());
        let scheduler = scheduler_with(Arc::clone(&store), Arc::clone(&queue));

        assert_eq!(scheduler.tick().await.unwrap(), 0);
        assert!(queue.submissions().is_empty());
        assert_eq!(store.status_of(id), Some(CampaignStatus::Scheduled));
    }

    #[tokio::test]
    async fn paused_campaign_is_not_dispatched() {
        let store = Arc::new(MemoryCampaignStore::new());
        let campaign = campaign_due_at(ChronoDuration::minutes(-5));
        let id = campaign.id;
        store.insert_campaign(campaign);
        store.set_status(id, CampaignStatus::Paused).await.unwrap();

        let queue = Arc::new(RecordingQueue::default());
        let scheduler = scheduler_with(Arc::clone(&store), Arc::clone(&queue));

        assert_eq!(scheduler.tick().await.unwrap(), 0);
        assert!(queue.submissions().is_empty());
    }
}
