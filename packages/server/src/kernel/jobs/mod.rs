//! Background job execution for campaign runs.

mod queue;

pub use queue::{
    InProcessJobQueue, JobQueue, JobQueueConfig, RetryPolicy, RunCampaignJob, SubmitOutcome,
};
