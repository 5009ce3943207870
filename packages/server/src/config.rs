use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Embeddings for semantic scoring; absent means lexical-only
    pub openai_api_key: Option<String>,
    pub opencorporates_api_key: Option<String>,
    pub google_maps_api_key: Option<String>,
    /// Lead notification webhook; absent means notifications are dropped
    pub notify_webhook_url: Option<String>,
    pub notify_recipients: Vec<String>,
    pub scheduler_poll_secs: u64,
    pub job_workers: usize,
    pub lead_limit: usize,
    pub adapter_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            opencorporates_api_key: env::var("OPENCORPORATES_API_KEY").ok(),
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY").ok(),
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL").ok(),
            notify_recipients: env::var("NOTIFY_RECIPIENTS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            scheduler_poll_secs: env::var("SCHEDULER_POLL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("SCHEDULER_POLL_SECS must be a valid number")?,
            job_workers: env::var("JOB_WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .context("JOB_WORKERS must be a valid number")?,
            lead_limit: env::var("LEAD_LIMIT")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("LEAD_LIMIT must be a valid number")?,
            adapter_timeout_secs: env::var("ADAPTER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("ADAPTER_TIMEOUT_SECS must be a valid number")?,
        })
    }
}
