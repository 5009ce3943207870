//! Embedding trait for the pluggable text-similarity collaborator.
//!
//! The scorer uses embeddings for its semantic component and must tolerate
//! absence: when no embedder is configured or a call fails, scoring degrades
//! gracefully to lexical-only.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{EmbedError, EmbedResult};

/// Produces a dense vector for a piece of text.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for the text.
    async fn embed(&self, text: &str) -> EmbedResult<Vec<f32>>;
}

/// Cosine similarity between two vectors, in `[-1.0, 1.0]`.
///
/// Mismatched lengths or a zero vector yield 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Mock embedder for testing.
///
/// Returns canned vectors keyed by exact input text; unknown inputs fail
/// with [`EmbedError::Unavailable`] unless a default vector is set.
#[derive(Default)]
pub struct MockEmbedder {
    vectors: RwLock<HashMap<String, Vec<f32>>>,
    default: RwLock<Option<Vec<f32>>>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned vector for an input text (builder pattern).
    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors
            .write()
            .unwrap()
            .insert(text.to_string(), vector);
        self
    }

    /// Vector returned for any input without a canned entry.
    pub fn with_default(self, vector: Vec<f32>) -> Self {
        *self.default.write().unwrap() = Some(vector);
        self
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> EmbedResult<Vec<f32>> {
        if let Some(v) = self.vectors.read().unwrap().get(text) {
            return Ok(v.clone());
        }
        self.default
            .read()
            .unwrap()
            .clone()
            .ok_or(EmbedError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_opposite_vectors_negative() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_length_mismatch() {
        let a = vec![1.0];
        let b = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }
}
