//! In-process campaign run queue.
//!
//! ```text
//!  submit(id) --> mpsc channel --> worker pool --> orchestrator.run(id)
//!                      ^                               |
//!                      +------- retry (backoff) -------+
//! ```
//!
//! Duplicate deliveries are harmless: the orchestrator's run guard turns
//! a second in-flight run into a no-op, so the queue only guarantees
//! at-least-once execution.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domains::campaigns::{CampaignOrchestrator, OrchestrationError};

/// A queued request to run one campaign.
#[derive(Debug, Clone)]
pub struct RunCampaignJob {
    pub campaign_id: Uuid,
    pub job_id: Uuid,
    pub attempt: u32,
}

impl RunCampaignJob {
    fn new(campaign_id: Uuid) -> Self {
        Self {
            campaign_id,
            job_id: Uuid::new_v4(),
            attempt: 1,
        }
    }

    fn next_attempt(&self) -> Self {
        Self {
            campaign_id: self.campaign_id,
            job_id: self.job_id,
            attempt: self.attempt + 1,
        }
    }
}

/// Result of submitting a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Queued; the job id identifies it in logs.
    Accepted(Uuid),
}

/// Retry behavior for retryable run failures (store and commit errors).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Base delay; doubles with each subsequent attempt.
    pub backoff: Duration,
}

impl RetryPolicy {
    fn delay_for(&self, attempt: u32) -> Duration {
        // attempt is 1-based: first retry waits the base delay.
        self.backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

#[derive(Debug, Clone)]
pub struct JobQueueConfig {
    pub workers: usize,
    pub queue_depth: usize,
    pub retry: Option<RetryPolicy>,
}

impl Default for JobQueueConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_depth: 256,
            retry: Some(RetryPolicy {
                max_retries: 2,
                backoff: Duration::from_secs(5),
            }),
        }
    }
}

/// Accepts campaign run requests for asynchronous execution.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn submit(&self, campaign_id: Uuid) -> Result<SubmitOutcome>;
}

/// Job queue backed by a tokio channel and a worker pool in this process.
///
/// The sender lives behind an `Option` so `shutdown` can close the channel
/// through a shared handle (the queue is held in `Arc`s by the server deps
/// and the scheduler).
pub struct InProcessJobQueue {
    tx: Mutex<Option<mpsc::Sender<RunCampaignJob>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl InProcessJobQueue {
    /// Spawns the worker pool and returns the queue handle.
    pub fn start(orchestrator: Arc<CampaignOrchestrator>, config: JobQueueConfig) -> Self {
        let (tx, rx) = mpsc::channel::<RunCampaignJob>(config.queue_depth.max(1));
        let rx = Arc::new(tokio::sync::Mutex::new(rx));

        let mut handles = Vec::with_capacity(config.workers.max(1));
        for worker_id in 0..config.workers.max(1) {
            let rx = Arc::clone(&rx);
            // Retries go through a weak sender so idle workers do not
            // keep the channel open after shutdown drops the queue.
            let retry_tx = tx.downgrade();
            let orchestrator = Arc::clone(&orchestrator);
            let retry = config.retry;
            handles.push(tokio::spawn(async move {
                loop {
                    let job = { rx.lock().await.recv().await };
                    let Some(job) = job else {
                        debug!(worker_id, "job queue closed; worker exiting");
                        break;
                    };
                    Self::process(&orchestrator, &retry_tx, retry, job).await;
                }
            }));
        }

        Self {
            tx: Mutex::new(Some(tx)),
            handles: Mutex::new(handles),
        }
    }

    async fn process(
        orchestrator: &CampaignOrchestrator,
        retry_tx: &mpsc::WeakSender<RunCampaignJob>,
        retry: Option<RetryPolicy>,
        job: RunCampaignJob,
    ) {
        match orchestrator.run(job.campaign_id).await {
            Ok(report) => {
                info!(
                    job_id = %job.job_id,
                    campaign_id = %job.campaign_id,
                    attempt = job.attempt,
                    leads = report.leads_generated,
                    "campaign run job finished"
                );
            }
            Err(OrchestrationError::AlreadyRunning(id)) => {
                // Duplicate delivery; the in-flight run covers it.
                debug!(job_id = %job.job_id, campaign_id = %id, "run already in flight; skipping");
            }
            Err(OrchestrationError::NotFound(id)) => {
                warn!(job_id = %job.job_id, campaign_id = %id, "campaign vanished before its run");
            }
            Err(err) => {
                let retryable = matches!(
                    err,
                    OrchestrationError::Commit(_) | OrchestrationError::Store(_)
                );
                match retry {
                    Some(policy) if retryable && job.attempt <= policy.max_retries => {
                        let delay = policy.delay_for(job.attempt);
                        warn!(
                            job_id = %job.job_id,
                            campaign_id = %job.campaign_id,
                            attempt = job.attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %err,
                            "campaign run failed; retrying"
                        );
                        tokio::time::sleep(delay).await;
                        if let Some(tx) = retry_tx.upgrade() {
                            if tx.send(job.next_attempt()).await.is_err() {
                                warn!(campaign_id = %job.campaign_id, "queue closed; dropping retry");
                            }
                        }
                    }
                    _ => {
                        error!(
                            job_id = %job.job_id,
                            campaign_id = %job.campaign_id,
                            attempt = job.attempt,
                            error = %err,
                            "campaign run failed"
                        );
                    }
                }
            }
        }
    }

    /// Stops accepting work and drains queued and in-flight jobs.
    ///
    /// Safe to call through a shared handle; later `submit` calls fail.
    pub async fn shutdown(&self) {
        drop(self.tx.lock().unwrap().take());
        let handles = std::mem::take(&mut *self.handles.lock().unwrap());
        for handle in handles {
            if let Err(err) = handle.await {
                error!(error = %err, "job worker panicked");
            }
        }
    }
}

#[async_trait]
impl JobQueue for InProcessJobQueue {
    async fn submit(&self, campaign_id: Uuid) -> Result<SubmitOutcome> {
        let job = RunCampaignJob::new(campaign_id);
        let job_id = job.job_id;
        let tx = self
            .tx
            .lock()
            .unwrap()
            .clone()
            .context("job queue is shut down")?;
        tx.send(job).await.context("job queue is shut down")?;
        debug!(%job_id, %campaign_id, "campaign run queued");
        Ok(SubmitOutcome::Accepted(job_id))
    }
}
