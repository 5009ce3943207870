//! Service traits wired through dependency injection.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Delivers campaign completion notices to interested parties.
///
/// Failures are logged and swallowed by callers. Notification is
/// fire-and-forget and must never affect run outcomes.
#[async_trait]
pub trait BaseNotifier: Send + Sync {
    async fn campaign_completed(
        &self,
        campaign_id: Uuid,
        campaign_name: &str,
        leads_generated: i64,
        recipients: &[String],
    ) -> Result<()>;
}
