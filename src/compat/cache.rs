//! Session cache for remote answers.
//!
//! Lives exactly as long as the resolver that owns it. Nothing is written to
//! disk. Unbounded: a machine has at most a few dozen distinct devices.

use std::collections::HashMap;

use super::CompatibilityResult;
use crate::logic::normalize::DeviceIds;

/// Storage for resolved results keyed by identifier pair.
///
/// Takes `&mut self`; a resolver shared across threads must wrap its cache
/// in a mutex so two components with the same pair cannot race on insert.
pub trait CompatibilityCache {
    fn get(&self, ids: &DeviceIds) -> Option<CompatibilityResult>;
    fn insert(&mut self, ids: DeviceIds, result: CompatibilityResult);
}

/// In-memory cache scoped to one run.
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    entries: HashMap<DeviceIds, CompatibilityResult>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CompatibilityCache for SessionCache {
    fn get(&self, ids: &DeviceIds) -> Option<CompatibilityResult> {
        self.entries.get(ids).cloned()
    }

    fn insert(&mut self, ids: DeviceIds, result: CompatibilityResult) {
        self.entries.insert(ids, result);
    }
}
