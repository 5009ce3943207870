//! OpenCorporates company registry adapter.
//!
//! Key-gated: construct only when an API token is configured. Registry
//! entries carry no website, so candidates from this source rely on name,
//! address and company type.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::{default_client, per_minute_limiter, DirectRateLimiter};
use crate::error::{SourceError, SourceResult};
use crate::traits::SourceAdapter;
use crate::types::{RawRecord, Source};

const SEARCH_URL: &str = "https://api.opencorporates.com/v0.4/companies/search";
const PER_PAGE: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: SearchResults,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    companies: Vec<CompanyWrapper>,
}

#[derive(Debug, Deserialize)]
struct CompanyWrapper {
    company: JsonValue,
}

/// Registry search adapter backed by the OpenCorporates API.
pub struct OpenCorporatesAdapter {
    client: reqwest::Client,
    limiter: Arc<DirectRateLimiter>,
    api_token: String,
}

impl OpenCorporatesAdapter {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            client: default_client(),
            // Free-tier token quota
            limiter: per_minute_limiter(30),
            api_token: api_token.into(),
        }
    }

    /// Map a region hint to an OpenCorporates jurisdiction code.
    ///
    /// Only India is mapped for now; anything else searches unfiltered.
    fn jurisdiction_code(region: &str) -> Option<&'static str> {
        if region.eq_ignore_ascii_case("india") {
            Some("in")
        } else {
            None
        }
    }

    fn to_record(company: JsonValue) -> Option<RawRecord> {
        let name = company.get("name")?.as_str()?.to_string();
        let company_type = company
            .get("company_type")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let address = company
            .get("registered_address_in_full")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Some(RawRecord::RegistryEntry {
            source: Source::OpenCorporates,
            name,
            company_type,
            address,
            raw: company,
        })
    }
}

#[async_trait]
impl SourceAdapter for OpenCorporatesAdapter {
    fn source(&self) -> Source {
        Source::OpenCorporates
    }

    async fn search(&self, query: &str, region: &str) -> SourceResult<Vec<RawRecord>> {
        self.limiter.until_ready().await;

        let mut params = vec![
            ("q", query.to_string()),
            ("api_token", self.api_token.clone()),
            ("per_page", PER_PAGE.to_string()),
        ];
        if let Some(code) = Self::jurisdiction_code(region) {
            params.push(("jurisdiction_code", code.to_string()));
        }

        debug!(query = %query, region = %region, "opencorporates search starting");

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| SourceError::http(Source::OpenCorporates, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable {
                provider: Source::OpenCorporates,
                reason: format!("HTTP {}", status),
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::http(Source::OpenCorporates, e))?;

        let records: Vec<RawRecord> = parsed
            .results
            .companies
            .into_iter()
            .filter_map(|w| Self::to_record(w.company))
            .collect();

        debug!(count = records.len(), "opencorporates search complete");
        Ok(records)
    }
}
