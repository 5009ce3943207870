use serde_json::Value as JsonValue;

use super::Source;

/// A raw candidate record as returned by one adapter call.
///
/// Each provider returns a differently shaped payload, so the record is a
/// tagged union with one variant per shape rather than a loose field map.
/// Records are ephemeral: they are produced by an adapter, consumed by the
/// extractor, and never persisted as-is (the extractor keeps the original
/// payload in `Candidate::raw` for audit).
#[derive(Debug, Clone)]
pub enum RawRecord {
    /// A web search hit: page title, snippet and result URL.
    SearchHit {
        source: Source,
        title: String,
        snippet: String,
        url: String,
    },

    /// A company registry entry with structured fields.
    RegistryEntry {
        source: Source,
        name: String,
        company_type: Option<String>,
        address: Option<String>,
        raw: JsonValue,
    },

    /// A places/maps establishment result.
    Place {
        source: Source,
        name: String,
        formatted_address: Option<String>,
        types: Vec<String>,
        raw: JsonValue,
    },
}

impl RawRecord {
    /// The provider this record came from.
    pub fn source(&self) -> Source {
        match self {
            RawRecord::SearchHit { source, .. }
            | RawRecord::RegistryEntry { source, .. }
            | RawRecord::Place { source, .. } => *source,
        }
    }
}
