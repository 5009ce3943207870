//! Google Places text search adapter.
//!
//! Key-gated like OpenCorporates. The text search endpoint returns no
//! website field (that requires the Place Details API), so candidates from
//! this source carry name, address and the place type tags only.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use super::{default_client, per_minute_limiter, DirectRateLimiter};
use crate::error::{SourceError, SourceResult};
use crate::traits::SourceAdapter;
use crate::types::{RawRecord, Source};

const SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
const MAX_RESULTS: usize = 10;

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    results: Vec<JsonValue>,
}

/// Establishment search adapter backed by the Places text search API.
pub struct GooglePlacesAdapter {
    client: reqwest::Client,
    limiter: Arc<DirectRateLimiter>,
    api_key: String,
}

impl GooglePlacesAdapter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: default_client(),
            limiter: per_minute_limiter(60),
            api_key: api_key.into(),
        }
    }

    fn to_record(place: JsonValue) -> Option<RawRecord> {
        let name = place.get("name")?.as_str()?.to_string();
        let formatted_address = place
            .get("formatted_address")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let types = place
            .get("types")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|t| t.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(RawRecord::Place {
            source: Source::GooglePlaces,
            name,
            formatted_address,
            types,
            raw: place,
        })
    }
}

#[async_trait]
impl SourceAdapter for GooglePlacesAdapter {
    fn source(&self) -> Source {
        Source::GooglePlaces
    }

    async fn search(&self, query: &str, region: &str) -> SourceResult<Vec<RawRecord>> {
        self.limiter.until_ready().await;

        let text_query = format!("{} {}", query, region);
        debug!(query = %text_query, "google places search starting");

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("query", text_query.as_str()),
                ("key", self.api_key.as_str()),
                ("type", "establishment"),
            ])
            .send()
            .await
            .map_err(|e| SourceError::http(Source::GooglePlaces, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable {
                provider: Source::GooglePlaces,
                reason: format!("HTTP {}", status),
            });
        }

        let parsed: PlacesResponse = response
            .json()
            .await
            .map_err(|e| SourceError::http(Source::GooglePlaces, e))?;

        let records: Vec<RawRecord> = parsed
            .results
            .into_iter()
            .take(MAX_RESULTS)
            .filter_map(Self::to_record)
            .collect();

        debug!(count = records.len(), "google places search complete");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_record_maps_place_fields() {
        let place = json!({
            "name": "Acme Security",
            "formatted_address": "42 Residency Rd, Bengaluru",
            "types": ["establishment", "point_of_interest"]
        });

        let record = GooglePlacesAdapter::to_record(place).unwrap();
        match record {
            RawRecord::Place {
                name,
                formatted_address,
                types,
                ..
            } => {
                assert_eq!(name, "Acme Security");
                assert_eq!(formatted_address.as_deref(), Some("42 Residency Rd, Bengaluru"));
                assert_eq!(types, vec!["establishment", "point_of_interest"]);
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn test_to_record_without_name_discarded() {
        assert!(GooglePlacesAdapter::to_record(json!({"types": []})).is_none());
    }
}
