use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::Source;

/// A business record in canonical shape, produced by the extractor.
///
/// `company_name` is guaranteed non-empty after trimming; everything else is
/// best-effort. `relevance_score` stays in `[0.0, 1.0]` and
/// `matched_keywords` is always a subset of the keywords it was scored
/// against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub company_name: String,
    pub website: Option<String>,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub employee_count: Option<i32>,
    pub revenue_range: Option<String>,
    pub source: Source,
    /// Original provider payload, retained verbatim for audit.
    pub raw: JsonValue,
    pub matched_keywords: Vec<String>,
    pub relevance_score: f64,
}

impl Candidate {
    /// Create a candidate with only the required fields set.
    pub fn new(company_name: impl Into<String>, source: Source, raw: JsonValue) -> Self {
        Self {
            company_name: company_name.into(),
            website: None,
            linkedin_url: None,
            email: None,
            phone: None,
            address: None,
            industry: None,
            description: None,
            employee_count: None,
            revenue_range: None,
            source,
            raw,
            matched_keywords: Vec::new(),
            relevance_score: 0.0,
        }
    }

    /// Concatenated text used for lexical and semantic scoring.
    pub fn scoring_text(&self) -> String {
        [
            Some(self.company_name.as_str()),
            self.industry.as_deref(),
            self.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}
