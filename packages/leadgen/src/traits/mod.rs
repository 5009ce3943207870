//! Trait seams for external collaborators.

mod adapter;
mod embedder;

pub use adapter::SourceAdapter;
pub use embedder::{cosine_similarity, Embedder, MockEmbedder};
