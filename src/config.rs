//! Scan configuration: loading, saving and validating settings files.
//!
//! Every field has a default, so an empty `{}` file is a valid config and
//! CLI flags only need to override what the user actually passed.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::compat::remote::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use crate::compat::{CompatibilitySource, HttpSource, OfflineSource, VendorTable};
use crate::types::ProbeStrategy;

/// Allowed remote timeout range, in seconds
const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=120;

/// Settings for one scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Base URL of the remote compatibility service
    pub endpoint: String,
    /// Per-lookup timeout
    pub timeout_secs: u64,
    /// Skip remote lookups entirely
    pub offline: bool,
    /// Replacement vendor fallback table (JSON)
    pub vendor_table: Option<PathBuf>,
    pub strategy: ProbeStrategy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            offline: false,
            vendor_table: None,
            strategy: ProbeStrategy::Auto,
        }
    }
}

impl ScanConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            anyhow::bail!("Endpoint must be specified");
        }
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            anyhow::bail!("Endpoint must be an http:// or https:// URL, got '{}'", endpoint);
        }

        if !TIMEOUT_RANGE.contains(&self.timeout_secs) {
            anyhow::bail!(
                "Timeout must be between {} and {} seconds, got {}",
                TIMEOUT_RANGE.start(),
                TIMEOUT_RANGE.end(),
                self.timeout_secs
            );
        }

        if let Some(table) = &self.vendor_table {
            if !table.is_file() {
                anyhow::bail!("Vendor table {:?} does not exist", table);
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured fallback table, or the built-in one.
    pub fn load_vendor_table(&self) -> Result<VendorTable> {
        match &self.vendor_table {
            Some(path) => VendorTable::load_from_file(path),
            None => VendorTable::builtin(),
        }
    }

    /// Remote source for this configuration.
    pub fn compatibility_source(&self) -> Box<dyn CompatibilitySource> {
        if self.offline {
            tracing::info!("Offline mode: remote lookups disabled");
            Box::new(OfflineSource)
        } else {
            Box::new(HttpSource::new(self.endpoint.trim(), self.timeout()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.strategy, ProbeStrategy::Auto);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: ScanConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"offline": true, "strategy": "wmic"}"#).unwrap();
        assert!(config.offline);
        assert_eq!(config.strategy, ProbeStrategy::Wmic);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let config = ScanConfig {
            endpoint: "ftp://example.org".into(),
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_timeout_out_of_range() {
        for timeout_secs in [0, 121] {
            let config = ScanConfig {
                timeout_secs,
                ..ScanConfig::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_rejects_missing_vendor_table() {
        let config = ScanConfig {
            vendor_table: Some(PathBuf::from("/nonexistent/table.json")),
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("switcheroo.json");
        let config = ScanConfig {
            offline: true,
            timeout_secs: 3,
            ..ScanConfig::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(ScanConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_builtin_vendor_table_by_default() {
        let table = ScanConfig::default().load_vendor_table().unwrap();
        assert_eq!(table.rules().len(), 7);
    }
}
