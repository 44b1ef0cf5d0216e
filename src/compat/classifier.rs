//! Response classification
//!
//! The remote source answers with an HTML/text page, not a structured API.
//! [`ResponseClassifier`] is the seam between "fetch a page" and "decide a
//! tier", so a structured client can replace [`KeywordClassifier`] without
//! touching the resolver.

use crate::types::Compatibility;

/// Turns a raw response body into a compatibility tier.
pub trait ResponseClassifier {
    fn classify(&self, body: &str) -> Compatibility;
}

/// Keyword groups, checked in order. The first group with any hit wins.
pub const KEYWORD_GROUPS: &[(Compatibility, &[&str])] = &[
    (Compatibility::Works, &["works", "supported", "ok", "yes"]),
    (Compatibility::Partial, &["partial", "limited", "issues"]),
    (Compatibility::Broken, &["broken", "unsupported", "no", "failed"]),
];

/// Case-insensitive substring scan over the whole body.
///
/// Known to be imprecise: the scan is over arbitrary page text, so an
/// unrelated "no" or "ok" anywhere on the page decides the tier. Group order
/// also means "unsupported" and even "broken" are reported as `works`, because
/// they contain "supported" and "ok". Kept as-is until the service offers
/// structured results.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl ResponseClassifier for KeywordClassifier {
    fn classify(&self, body: &str) -> Compatibility {
        let lowered = body.to_lowercase();
        KEYWORD_GROUPS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(tier, _)| *tier)
            .unwrap_or(Compatibility::Unknown)
    }
}
