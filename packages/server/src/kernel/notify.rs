//! Campaign completion notifiers.
//!
//! The webhook notifier POSTs a JSON payload to a configured endpoint.
//! Deployments without an endpoint get the no-op notifier.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::traits::BaseNotifier;

#[derive(Debug, Serialize)]
struct CompletionPayload<'a> {
    event: &'static str,
    campaign_id: Uuid,
    campaign_name: &'a str,
    leads_generated: i64,
    recipients: &'a [String],
}

/// Delivers completion notices over an HTTP webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl BaseNotifier for WebhookNotifier {
    async fn campaign_completed(
        &self,
        campaign_id: Uuid,
        campaign_name: &str,
        leads_generated: i64,
        recipients: &[String],
    ) -> Result<()> {
        let payload = CompletionPayload {
            event: "campaign.completed",
            campaign_id,
            campaign_name,
            leads_generated,
            recipients,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .context("failed to deliver completion webhook")?;

        response
            .error_for_status()
            .context("completion webhook rejected")?;

        info!(
            campaign_id = %campaign_id,
            leads = leads_generated,
            "completion notice delivered"
        );
        Ok(())
    }
}

/// Logs completion instead of delivering anywhere.
pub struct NoopNotifier;

#[async_trait]
impl BaseNotifier for NoopNotifier {
    async fn campaign_completed(
        &self,
        campaign_id: Uuid,
        campaign_name: &str,
        leads_generated: i64,
        _recipients: &[String],
    ) -> Result<()> {
        info!(
            campaign_id = %campaign_id,
            campaign_name,
            leads = leads_generated,
            "campaign completed (no notifier configured)"
        );
        Ok(())
    }
}

/// Records delivered notices for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedNotice {
    pub campaign_id: Uuid,
    pub campaign_name: String,
    pub leads_generated: i64,
    pub recipients: Vec<String>,
}

#[derive(Default)]
pub struct MockNotifier {
    notices: Mutex<Vec<RecordedNotice>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<RecordedNotice> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn campaign_completed(
        &self,
        campaign_id: Uuid,
        campaign_name: &str,
        leads_generated: i64,
        recipients: &[String],
    ) -> Result<()> {
        self.notices.lock().unwrap().push(RecordedNotice {
            campaign_id,
            campaign_name: campaign_name.to_string(),
            leads_generated,
            recipients: recipients.to_vec(),
        });
        Ok(())
    }
}
