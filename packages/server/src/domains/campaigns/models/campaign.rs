use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Campaign lifecycle status.
///
/// Transitions are monotonic (Scheduled → Active → Completed, with Paused as
/// an externally triggered detour from Active) except recurrence, which
/// resets Completed → Scheduled for the next occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Scheduled,
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(Self::Scheduled),
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lead generation campaign.
///
/// Mutated only by the orchestrator, the scheduler and the campaign-edit
/// collaborators (out of scope here). `keywords` is an ordered sequence:
/// order affects provider query construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub keywords: Vec<String>,
    pub region: String,
    pub status: CampaignStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Recurrence pattern string (`daily` / `weekly` / `monthly`), if any
    pub recurrence: Option<String>,
    pub leads_generated: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// A new scheduled campaign (primarily for tests and seeding).
    pub fn new_scheduled(
        name: impl Into<String>,
        keywords: Vec<String>,
        region: impl Into<String>,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            keywords,
            region: region.into(),
            status: CampaignStatus::Scheduled,
            scheduled_at,
            recurrence: None,
            leads_generated: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_recurrence(mut self, pattern: impl Into<String>) -> Self {
        self.recurrence = Some(pattern.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            CampaignStatus::Scheduled,
            CampaignStatus::Active,
            CampaignStatus::Paused,
            CampaignStatus::Completed,
        ] {
            assert_eq!(CampaignStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(CampaignStatus::parse("archived"), None);
    }
}
