//! DuckDuckGo HTML search adapter.
//!
//! Queries the HTML endpoint (no API key required) and scrapes the result
//! blocks with CSS selectors. Result shape: `div.result` containing an
//! `a.result__a` title link and a `div.result__snippet`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;

use super::{default_client, per_minute_limiter, DirectRateLimiter};
use crate::error::{SourceError, SourceResult};
use crate::traits::SourceAdapter;
use crate::types::{RawRecord, Source};

/// Maximum result blocks parsed per search.
const MAX_RESULTS: usize = 10;

/// Realistic browser user agents, rotated per request. A single fixed UA
/// trips the endpoint's scrape detection faster.
const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// Search adapter backed by DuckDuckGo's HTML results page.
pub struct DuckDuckGoAdapter {
    client: reqwest::Client,
    limiter: Arc<DirectRateLimiter>,
    user_agents: Vec<String>,
    next_agent: AtomicUsize,
}

impl Default for DuckDuckGoAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoAdapter {
    pub fn new() -> Self {
        Self {
            client: default_client(),
            // HTML endpoint is unauthenticated; keep well under scrape limits
            limiter: per_minute_limiter(20),
            user_agents: USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            next_agent: AtomicUsize::new(0),
        }
    }

    /// Replace the rotation pool with custom user agents.
    pub fn with_user_agents(mut self, user_agents: Vec<String>) -> Self {
        if !user_agents.is_empty() {
            self.user_agents = user_agents;
        }
        self
    }

    fn user_agent(&self) -> &str {
        let idx = self.next_agent.fetch_add(1, Ordering::Relaxed);
        &self.user_agents[idx % self.user_agents.len()]
    }

    fn parse_results(html: &str) -> Vec<RawRecord> {
        let document = Html::parse_document(html);
        let result_sel = Selector::parse("div.result").expect("valid selector");
        let title_sel = Selector::parse("a.result__a").expect("valid selector");
        let snippet_sel = Selector::parse("div.result__snippet").expect("valid selector");

        let mut records = Vec::new();
        for result in document.select(&result_sel).take(MAX_RESULTS) {
            let title_elem = result.select(&title_sel).next();
            let snippet_elem = result.select(&snippet_sel).next();

            let (Some(title_elem), Some(snippet_elem)) = (title_elem, snippet_elem) else {
                continue;
            };

            let title = title_elem.text().collect::<String>().trim().to_string();
            let url = title_elem.value().attr("href").unwrap_or("").to_string();
            let snippet = snippet_elem.text().collect::<String>().trim().to_string();

            records.push(RawRecord::SearchHit {
                source: Source::DuckDuckGo,
                title,
                snippet,
                url,
            });
        }

        records
    }
}

#[async_trait]
impl SourceAdapter for DuckDuckGoAdapter {
    fn source(&self) -> Source {
        Source::DuckDuckGo
    }

    async fn search(&self, query: &str, region: &str) -> SourceResult<Vec<RawRecord>> {
        self.limiter.until_ready().await;

        let search_query = format!("{} companies {}", query, region);
        debug!(query = %search_query, "duckduckgo search starting");

        let response = self
            .client
            .get("https://html.duckduckgo.com/html/")
            .query(&[("q", search_query.as_str())])
            .header("User-Agent", self.user_agent())
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
            .map_err(|e| SourceError::http(Source::DuckDuckGo, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable {
                provider: Source::DuckDuckGo,
                reason: format!("HTTP {}", status),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| SourceError::http(Source::DuckDuckGo, e))?;

        let records = Self::parse_results(&html);
        debug!(count = records.len(), "duckduckgo search complete");
        Ok(records)
    }
}
