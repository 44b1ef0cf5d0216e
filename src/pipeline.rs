//! Scan pipeline: detect → dedup → resolve → aggregate.
//!
//! Sequential: each component is resolved before the next, and the
//! only blocking step is the remote lookup, bounded by its timeout.

use crate::compat::{CompatibilityCache, CompatibilitySource};
use crate::hardware::{HardwareComponent, HardwareQuery, detect_components};
use crate::logic::aggregate::aggregate;
use crate::logic::dedup::dedup_components;
use crate::logic::resolver::Resolver;
use crate::report::{Report, SystemInfo};

/// Result of one scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// At least one component was detected and resolved
    Completed(Report),
    /// Nothing was detected; the report is empty and unscored
    NoComponents(Report),
}

impl ScanOutcome {
    pub fn report(&self) -> &Report {
        match self {
            Self::Completed(report) | Self::NoComponents(report) => report,
        }
    }

    pub fn into_report(self) -> Report {
        match self {
            Self::Completed(report) | Self::NoComponents(report) => report,
        }
    }
}

/// Detect and deduplicate components.
pub fn inventory(query: &dyn HardwareQuery) -> Vec<HardwareComponent> {
    dedup_components(detect_components(query))
}

/// Run the full pipeline against one query and resolver.
pub fn scan<S, C>(
    query: &dyn HardwareQuery,
    resolver: &mut Resolver<S, C>,
    system: SystemInfo,
) -> ScanOutcome
where
    S: CompatibilitySource,
    C: CompatibilityCache,
{
    let components = inventory(query);
    if components.is_empty() {
        tracing::warn!("No components detected via {}", query.name());
        return ScanOutcome::NoComponents(aggregate(system, Vec::new()));
    }

    let resolved = resolver.resolve_all(components);
    tracing::info!(
        "Resolved {} component(s) with {} remote lookup(s)",
        resolved.len(),
        resolver.lookups()
    );
    ScanOutcome::Completed(aggregate(system, resolved))
}
