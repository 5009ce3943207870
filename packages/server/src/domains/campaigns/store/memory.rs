//! In-memory campaign store for tests.
//!
//! A single mutex over state plays the role of the transaction boundary:
//! `commit_run` applies the batch and the status/counter update atomically
//! with respect to every other operation. A failure toggle simulates
//! commit failures for rollback tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::CampaignStore;
use crate::domains::campaigns::models::{AutoLead, Campaign, CampaignStatus, NewAutoLead};

#[derive(Default)]
struct State {
    campaigns: HashMap<Uuid, Campaign>,
    leads: HashMap<Uuid, Vec<AutoLead>>,
}

/// In-memory store with canned failure support.
#[derive(Default)]
pub struct MemoryCampaignStore {
    state: Mutex<State>,
    fail_commits: AtomicBool,
}

impl MemoryCampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a campaign.
    pub fn insert_campaign(&self, campaign: Campaign) {
        self.state
            .lock()
            .unwrap()
            .campaigns
            .insert(campaign.id, campaign);
    }

    /// Make every subsequent `commit_run` fail (and change nothing).
    pub fn fail_next_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Current status of a campaign, for assertions.
    pub fn status_of(&self, id: Uuid) -> Option<CampaignStatus> {
        self.state
            .lock()
            .unwrap()
            .campaigns
            .get(&id)
            .map(|c| c.status)
    }

    /// Persisted leads for a campaign, for assertions.
    pub fn leads_of(&self, id: Uuid) -> Vec<AutoLead> {
        self.state
            .lock()
            .unwrap()
            .leads
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl CampaignStore for MemoryCampaignStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Campaign>> {
        Ok(self.state.lock().unwrap().campaigns.get(&id).cloned())
    }

    async fn find_due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<Campaign>> {
        let state = self.state.lock().unwrap();
        let mut due: Vec<Campaign> = state
            .campaigns
            .values()
            .filter(|c| {
                c.status == CampaignStatus::Scheduled
                    && c.scheduled_at.map(|at| at <= now).unwrap_or(false)
            })
            .cloned()
            .collect();
        due.sort_by_key(|c| c.scheduled_at);
        Ok(due)
    }

    async fn set_status(&self, id: Uuid, status: CampaignStatus) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let campaign = state
            .campaigns
            .get_mut(&id)
            .ok_or_else(|| anyhow!("campaign {} not found", id))?;
        campaign.status = status;
        campaign.updated_at = Utc::now();
        Ok(())
    }

    async fn commit_run(&self, id: Uuid, leads: &[NewAutoLead]) -> Result<i64> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated commit failure"));
        }

        let mut state = self.state.lock().unwrap();
        if !state.campaigns.contains_key(&id) {
            return Err(anyhow!("campaign {} not found", id));
        }

        let now = Utc::now();
        let committed: Vec<AutoLead> = leads
            .iter()
            .map(|lead| AutoLead {
                id: Uuid::new_v4(),
                campaign_id: lead.campaign_id,
                company_name: lead.company_name.clone(),
                website: lead.website.clone(),
                linkedin_url: lead.linkedin_url.clone(),
                email: lead.email.clone(),
                phone: lead.phone.clone(),
                address: lead.address.clone(),
                industry: lead.industry.clone(),
                keywords_matched: lead.keywords_matched.clone(),
                relevance_score: lead.relevance_score,
                source: lead.source.clone(),
                raw_data: lead.raw_data.clone(),
                created_at: now,
            })
            .collect();

        let count = committed.len() as i64;
        state.leads.entry(id).or_default().extend(committed);

        if let Some(campaign) = state.campaigns.get_mut(&id) {
            campaign.leads_generated = count as i32;
            campaign.status = CampaignStatus::Completed;
            campaign.updated_at = now;
        }

        Ok(count)
    }

    async fn reschedule(&self, id: Uuid, next_at: DateTime<Utc>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let campaign = state
            .campaigns
            .get_mut(&id)
            .ok_or_else(|| anyhow!("campaign {} not found", id))?;
        campaign.status = CampaignStatus::Scheduled;
        campaign.scheduled_at = Some(next_at);
        campaign.updated_at = Utc::now();
        Ok(())
    }

    async fn count_leads(&self, id: Uuid) -> Result<i64> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .leads
            .get(&id)
            .map(|l| l.len() as i64)
            .unwrap_or(0))
    }
}
