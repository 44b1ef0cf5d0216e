//! Compatibility sources
//!
//! Everything the resolver consults to classify a component:
//!
//! - `remote`: the online lookup service and its tagged [`LookupOutcome`]
//! - `classifier`: turns a raw response body into a [`Compatibility`] tier
//! - `fallback`: the data-driven vendor table used when remote has no answer
//! - `cache`: per-run memo of remote answers keyed by identifier pair

pub mod cache;
pub mod classifier;
pub mod fallback;
pub mod remote;

use serde::Serialize;
use std::fmt;

use crate::types::{Compatibility, ResultSource, ResultStatus};

pub use cache::{CompatibilityCache, SessionCache};
pub use classifier::{KeywordClassifier, ResponseClassifier};
pub use fallback::{VendorRule, VendorTable};
pub use remote::{CompatibilitySource, HttpSource, LookupOutcome, OfflineSource};

/// Outcome of resolving one component.
///
/// Only constructible through the named constructors, which keep status and
/// source consistent: `Found` always comes from `Remote`, `Estimated` always
/// from `FallbackTable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityResult {
    status: ResultStatus,
    compatibility: Compatibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    source: ResultSource,
}

impl CompatibilityResult {
    /// Classified by the remote source.
    pub fn remote(compatibility: Compatibility) -> Self {
        Self {
            status: ResultStatus::Found,
            compatibility,
            notes: None,
            source: ResultSource::Remote,
        }
    }

    /// Estimated from the vendor fallback table.
    pub fn estimated(compatibility: Compatibility, notes: Option<String>) -> Self {
        Self {
            status: ResultStatus::Estimated,
            compatibility,
            notes,
            source: ResultSource::FallbackTable,
        }
    }

    /// Nothing could classify the component.
    pub fn unknown() -> Self {
        Self {
            status: ResultStatus::Unknown,
            compatibility: Compatibility::Unknown,
            notes: None,
            source: ResultSource::None,
        }
    }

    pub fn status(&self) -> ResultStatus {
        self.status
    }

    pub fn compatibility(&self) -> Compatibility {
        self.compatibility
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn source(&self) -> ResultSource {
        self.source
    }
}

impl fmt::Display for CompatibilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.compatibility, self.status, self.source)
    }
}
