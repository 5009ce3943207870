use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use leadgen::Candidate;

/// An auto-generated lead committed for one campaign run.
///
/// Created only by the orchestrator after pipeline completion; immutable
/// here (the downstream review workflow is an external collaborator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoLead {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub company_name: String,
    pub website: Option<String>,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub keywords_matched: Vec<String>,
    pub relevance_score: f64,
    pub source: String,
    /// Original provider payload kept for audit
    pub raw_data: JsonValue,
    pub created_at: DateTime<Utc>,
}

/// Insert form of an [`AutoLead`], built from a surviving pipeline candidate.
#[derive(Debug, Clone)]
pub struct NewAutoLead {
    pub campaign_id: Uuid,
    pub company_name: String,
    pub website: Option<String>,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub keywords_matched: Vec<String>,
    pub relevance_score: f64,
    pub source: String,
    pub raw_data: JsonValue,
}

impl NewAutoLead {
    /// Build the committed form of a canonical candidate.
    pub fn from_candidate(campaign_id: Uuid, candidate: &Candidate) -> Self {
        Self {
            campaign_id,
            company_name: candidate.company_name.clone(),
            website: candidate.website.clone(),
            linkedin_url: candidate.linkedin_url.clone(),
            email: candidate.email.clone(),
            phone: candidate.phone.clone(),
            address: candidate.address.clone(),
            industry: candidate.industry.clone(),
            keywords_matched: candidate.matched_keywords.clone(),
            relevance_score: candidate.relevance_score,
            source: candidate.source.as_str().to_string(),
            raw_data: candidate.raw.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadgen::Source;
    use serde_json::json;

    #[test]
    fn test_from_candidate_carries_all_fields() {
        let mut candidate = Candidate::new(
            "Acme Cloud",
            Source::DuckDuckGo,
            json!({"title": "Acme Cloud - Home"}),
        );
        candidate.website = Some("https://acme.example.com".to_string());
        candidate.matched_keywords = vec!["cloud".to_string()];
        candidate.relevance_score = 0.6;

        let campaign_id = Uuid::new_v4();
        let lead = NewAutoLead::from_candidate(campaign_id, &candidate);

        assert_eq!(lead.campaign_id, campaign_id);
        assert_eq!(lead.company_name, "Acme Cloud");
        assert_eq!(lead.website.as_deref(), Some("https://acme.example.com"));
        assert_eq!(lead.keywords_matched, vec!["cloud"]);
        assert_eq!(lead.source, "duckduckgo");
        assert_eq!(lead.raw_data["title"], "Acme Cloud - Home");
    }
}
