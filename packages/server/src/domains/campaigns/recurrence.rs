//! Recurrence patterns for scheduled campaigns.

use chrono::{DateTime, Duration, Utc};

/// How often a recurring campaign re-runs after completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    /// Approximated as a fixed 30-day interval.
    Monthly,
}

impl RecurrencePattern {
    /// Case-insensitive parse. Unknown values yield `None` and the
    /// campaign is treated as one-shot.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Next run time counted from `from`.
    pub fn next_occurrence(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Daily => from + Duration::days(1),
            Self::Weekly => from + Duration::weeks(1),
            Self::Monthly => from + Duration::days(30),
        }
    }
}
