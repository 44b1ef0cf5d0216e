//! Compatibility Resolver
//!
//! Classifies one component at a time in tiers:
//!
//! | Step | Condition                         | Result                          |
//! |------|-----------------------------------|---------------------------------|
//! | 1    | ids present and cached            | cached result, no network call  |
//! | 2    | ids present, remote gives a tier  | `found` / `remote`, cached      |
//! | 3    | vendor matches the fallback table | `estimated` / `fallback-table`  |
//! | 4    | nothing matched                   | `unknown` / `none`              |
//!
//! Remote failures never reach the caller. Each [`LookupOutcome`] is matched
//! explicitly and everything but a real tier falls through to the table.

use crate::compat::{
    CompatibilityCache, CompatibilityResult, CompatibilitySource, LookupOutcome, SessionCache,
    VendorTable,
};
use crate::hardware::HardwareComponent;
use crate::types::Compatibility;

/// Tiered resolver owning its session cache.
pub struct Resolver<S: CompatibilitySource, C: CompatibilityCache = SessionCache> {
    source: S,
    table: VendorTable,
    cache: C,
    lookups: usize,
}

impl<S: CompatibilitySource> Resolver<S, SessionCache> {
    /// Resolver with a fresh session cache.
    pub fn new(source: S, table: VendorTable) -> Self {
        Self::with_cache(source, table, SessionCache::new())
    }
}

impl<S: CompatibilitySource, C: CompatibilityCache> Resolver<S, C> {
    pub fn with_cache(source: S, table: VendorTable, cache: C) -> Self {
        Self {
            source,
            table,
            cache,
            lookups: 0,
        }
    }

    /// Number of remote lookups issued so far.
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Classify a single component.
    pub fn resolve(&mut self, component: &HardwareComponent) -> CompatibilityResult {
        if let Some(ids) = &component.ids {
            if let Some(cached) = self.cache.get(ids) {
                tracing::debug!("Cache hit for {}", ids);
                return cached;
            }

            self.lookups += 1;
            match self.source.lookup(ids) {
                LookupOutcome::Found(Compatibility::Unknown) => {
                    tracing::debug!("Remote source has no verdict for {}", ids);
                }
                LookupOutcome::Found(tier) => {
                    let result = CompatibilityResult::remote(tier);
                    self.cache.insert(ids.clone(), result.clone());
                    return result;
                }
                LookupOutcome::Disabled => {}
                outcome @ (LookupOutcome::TimedOut
                | LookupOutcome::Unreachable(_)
                | LookupOutcome::Rejected(_)
                | LookupOutcome::Malformed(_)) => {
                    tracing::warn!("Remote lookup for {} {}; using vendor table", ids, outcome);
                }
            }
        }

        let result = self.table.classify(&component.vendor);
        tracing::debug!("{} -> {} from vendor table", component, result);
        result
    }

    /// Resolve every component in order.
    pub fn resolve_all(
        &mut self,
        components: Vec<HardwareComponent>,
    ) -> Vec<(HardwareComponent, CompatibilityResult)> {
        components
            .into_iter()
            .map(|component| {
                let result = self.resolve(&component);
                (component, result)
            })
            .collect()
    }
}
