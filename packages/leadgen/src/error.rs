//! Typed errors for the lead aggregation library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on the failure mode of each source.

use thiserror::Error;

use crate::types::Source;

/// Errors a source adapter can surface to the pipeline.
///
/// The pipeline recovers from all of these locally: a failed adapter
/// contributes nothing and the run continues with the rest.
///
/// The field is deliberately not named `source`: thiserror reserves that
/// name for the error cause chain, and [`Source`] is not an error.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The provider could not be reached or returned an unusable response.
    #[error("{provider} unavailable: {reason}")]
    Unavailable { provider: Source, reason: String },

    /// The adapter did not return within its deadline.
    #[error("{provider} timed out")]
    Timeout { provider: Source },
}

impl SourceError {
    /// Wrap an HTTP-level failure as `Unavailable`.
    pub fn http(provider: Source, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return SourceError::Timeout { provider };
        }
        SourceError::Unavailable {
            provider,
            reason: err.to_string(),
        }
    }

    /// The provider this error belongs to.
    pub fn provider(&self) -> Source {
        match self {
            SourceError::Unavailable { provider, .. } | SourceError::Timeout { provider } => {
                *provider
            }
        }
    }
}

/// Errors from the pluggable embedding collaborator.
///
/// The scorer tolerates all of these by degrading to lexical-only scoring.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// No embedding provider is configured.
    #[error("embedding service unavailable")]
    Unavailable,

    /// The provider call failed.
    #[error("embedding request failed: {0}")]
    Request(String),
}

/// Result type alias for adapter operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;


/// Result type alias for embedding operations.
pub type EmbedResult<T> = std::result::Result<T, EmbedError>;
