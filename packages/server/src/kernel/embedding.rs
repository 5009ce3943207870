//! OpenAI-backed embedding service.
//!
//! Implements the library's `Embedder` trait over the OpenAI embeddings
//! API. Scoring tolerates failures here, so errors map into the
//! library's embed error type rather than aborting a run.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use leadgen::traits::Embedder;
use leadgen::error::{EmbedError, EmbedResult};

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
const EMBEDDING_MODEL: &str = "text-embedding-3-small";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct OpenAiEmbeddingService {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiEmbeddingService {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbeddingService {
    async fn embed(&self, text: &str) -> EmbedResult<Vec<f32>> {
        let request = EmbeddingRequest {
            model: EMBEDDING_MODEL,
            input: text,
        };

        let response = self
            .client
            .post(EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbedError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            debug!(%status, "embeddings request rejected");
            return Err(EmbedError::Request(format!(
                "embeddings API returned {status}"
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::Request(e.to_string()))?;

        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbedError::Request("embeddings response had no data".to_string()))
    }
}
