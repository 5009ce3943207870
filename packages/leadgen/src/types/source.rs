use serde::{Deserialize, Serialize};

/// Identifies one external data provider.
///
/// The order adapters are configured in defines source priority: when two
/// duplicate candidates carry equal scores, the one from the earlier-listed
/// source wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    DuckDuckGo,
    OpenCorporates,
    GooglePlaces,
}

impl Source {
    /// Stable string identifier, used for persisted leads and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::DuckDuckGo => "duckduckgo",
            Source::OpenCorporates => "opencorporates",
            Source::GooglePlaces => "google_places",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_roundtrip() {
        assert_eq!(Source::DuckDuckGo.as_str(), "duckduckgo");
        assert_eq!(Source::GooglePlaces.to_string(), "google_places");
    }
}
