//! Shared dependency container handed to HTTP handlers.

use std::sync::Arc;

use crate::domains::campaigns::{CampaignOrchestrator, CampaignStore};
use crate::kernel::jobs::JobQueue;

pub struct ServerDeps {
    pub store: Arc<dyn CampaignStore>,
    pub orchestrator: Arc<CampaignOrchestrator>,
    pub queue: Arc<dyn JobQueue>,
}
