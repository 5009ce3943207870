//! Extractor/normalizer: raw provider records into canonical candidates.
//!
//! One normalization function per record variant. Returning `None` discards
//! the record; that happens only when no usable company name can be derived.

use serde_json::json;
use url::Url;

use crate::types::{Candidate, RawRecord};

/// Title separators recognized when deriving a company name.
const NAME_SEPARATORS: [&str; 2] = [" - ", " | "];

/// Controlled vocabulary for the best-effort industry tag. First
/// case-insensitive match in free text wins.
const INDUSTRY_VOCABULARY: [&str; 10] = [
    "software",
    "technology",
    "consulting",
    "services",
    "solutions",
    "manufacturing",
    "retail",
    "healthcare",
    "finance",
    "education",
];

/// Normalize one raw record into a canonical candidate.
///
/// `None` means the record is discarded (empty company name after trim).
pub fn extract(record: RawRecord) -> Option<Candidate> {
    match record {
        RawRecord::SearchHit {
            source,
            title,
            snippet,
            url,
        } => {
            let name = company_name_from_title(&title)?;
            let raw = json!({ "title": title, "snippet": snippet, "url": url });

            let mut candidate = Candidate::new(name, source, raw);
            candidate.website = website_origin(&url);
            candidate.industry = industry_from_text(&snippet);
            candidate.description = Some(snippet);
            Some(candidate)
        }

        RawRecord::RegistryEntry {
            source,
            name,
            company_type,
            address,
            raw,
        } => {
            let name = non_empty(&name)?;
            let mut candidate = Candidate::new(name, source, raw);
            candidate.industry = company_type.as_deref().and_then(non_empty);
            candidate.address = address;
            Some(candidate)
        }

        RawRecord::Place {
            source,
            name,
            formatted_address,
            types,
            raw,
        } => {
            let name = non_empty(&name)?;
            let mut candidate = Candidate::new(name, source, raw);
            candidate.address = formatted_address;
            if !types.is_empty() {
                candidate.industry = Some(types.join(", "));
            }
            Some(candidate)
        }
    }
}

/// Derive the company name from a title-like field: text before the first
/// recognized separator, trimmed. Empty after trim means discard.
fn company_name_from_title(title: &str) -> Option<String> {
    let mut name = title;
    for sep in NAME_SEPARATORS {
        if let Some(idx) = name.find(sep) {
            name = &name[..idx];
        }
    }
    non_empty(name)
}

/// Normalized website origin (scheme + host) from an absolute URL.
fn website_origin(raw_url: &str) -> Option<String> {
    if !raw_url.starts_with("http") {
        return None;
    }
    let parsed = Url::parse(raw_url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("{}://{}", parsed.scheme(), host))
}

/// First controlled-vocabulary term found in the text, title-cased.
fn industry_from_text(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    INDUSTRY_VOCABULARY
        .iter()
        .find(|term| lower.contains(*term))
        .map(|term| title_case(term))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
