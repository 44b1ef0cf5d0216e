//! Vendor fallback table
//!
//! When the remote source has no answer, a component is estimated from its
//! vendor alone. The table is data, not code: the built-in copy lives in
//! `data/vendor_table.json` and a replacement can be loaded from disk.
//!
//! Rules are evaluated in file order; the first rule whose `match` token is a
//! case-insensitive substring of the vendor wins.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::CompatibilityResult;
use crate::types::Compatibility;

const BUILTIN_TABLE: &str = include_str!("../../data/vendor_table.json");

/// One vendor rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRule {
    /// Lowercase token matched against the vendor name
    #[serde(rename = "match")]
    pub token: String,
    pub compatibility: Compatibility,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Ordered vendor rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VendorTable {
    rules: Vec<VendorRule>,
}

impl VendorTable {
    /// Build a table from rules, normalizing tokens to lowercase.
    pub fn new(rules: Vec<VendorRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| VendorRule {
                token: rule.token.trim().to_lowercase(),
                ..rule
            })
            .collect();
        Self { rules }
    }

    /// The table shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TABLE).context("Built-in vendor table is invalid")
    }

    /// Parse a table from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json).context("Failed to parse vendor table JSON")?;
        let table = Self::new(table.rules);
        table.validate()?;
        Ok(table)
    }

    /// Load a table from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read vendor table from {:?}", path.as_ref()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid vendor table {:?}", path.as_ref()))
    }

    fn validate(&self) -> Result<()> {
        if let Some(idx) = self.rules.iter().position(|r| r.token.is_empty()) {
            anyhow::bail!("Vendor rule #{} has an empty match token", idx + 1);
        }
        Ok(())
    }

    pub fn rules(&self) -> &[VendorRule] {
        &self.rules
    }

    /// First rule matching the vendor, if any.
    pub fn find(&self, vendor: &str) -> Option<&VendorRule> {
        let lowered = vendor.to_lowercase();
        self.rules.iter().find(|rule| lowered.contains(&rule.token))
    }

    /// Estimate a component's compatibility from its vendor.
    pub fn classify(&self, vendor: &str) -> CompatibilityResult {
        match self.find(vendor) {
            Some(rule) => CompatibilityResult::estimated(rule.compatibility, rule.notes.clone()),
            None => CompatibilityResult::unknown(),
        }
    }
}
