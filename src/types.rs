//! Shared enums for hardware components and compatibility results.
//!
//! Every classification in the pipeline is one of these enums instead of a
//! loose string, so exhaustive matching covers every tier and bucket.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Kind of detected device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum ComponentType {
    #[strum(serialize = "GPU")]
    #[serde(rename = "GPU")]
    Gpu,
    #[strum(serialize = "Network")]
    Network,
    #[strum(serialize = "WiFi")]
    #[serde(rename = "WiFi")]
    Wifi,
    #[strum(serialize = "Audio")]
    Audio,
    #[strum(serialize = "CPU")]
    #[serde(rename = "CPU")]
    Cpu,
}

/// Linux support tier of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Compatibility {
    Works,
    Partial,
    Broken,
    #[default]
    Unknown,
}

impl Compatibility {
    /// Returns true if the user should look at this component before switching.
    pub fn needs_attention(self) -> bool {
        !matches!(self, Self::Works)
    }
}

/// How a compatibility result was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    /// Classified by the remote compatibility source
    Found,
    /// Estimated from the vendor fallback table
    Estimated,
    /// Nothing could classify the component
    Unknown,
    /// Resolution failed outright; part of the report schema for sinks
    /// that merge results from other resolvers
    Error,
}

/// Where a compatibility result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ResultSource {
    Remote,
    FallbackTable,
    None,
}

/// Hardware query strategy requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter, clap::ValueEnum)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProbeStrategy {
    /// Pick the best strategy available on this host
    #[default]
    Auto,
    /// Linux sysfs/procfs
    Sysfs,
    /// Windows CIM through PowerShell (structured JSON)
    Cim,
    /// Windows wmic tabular output
    Wmic,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_component_type_display() {
        assert_eq!(ComponentType::Gpu.to_string(), "GPU");
        assert_eq!(ComponentType::Wifi.to_string(), "WiFi");
        assert_eq!(ComponentType::Cpu.to_string(), "CPU");
    }

    #[test]
    fn test_compatibility_parse() {
        assert_eq!(Compatibility::from_str("works").ok(), Some(Compatibility::Works));
        assert_eq!(Compatibility::from_str("broken").ok(), Some(Compatibility::Broken));
        assert!(Compatibility::from_str("maybe").is_err());
    }

    #[test]
    fn test_needs_attention() {
        let flagged: Vec<Compatibility> = Compatibility::iter()
            .filter(|c| c.needs_attention())
            .collect();
        assert_eq!(
            flagged,
            vec![Compatibility::Partial, Compatibility::Broken, Compatibility::Unknown]
        );
    }

    #[test]
    fn test_result_source_serialization() {
        assert_eq!(ResultSource::FallbackTable.to_string(), "fallback-table");
        let json = serde_json::to_string(&ResultSource::FallbackTable).unwrap();
        assert_eq!(json, "\"fallback-table\"");
    }

    #[test]
    fn test_component_type_serde_matches_display() {
        for kind in ComponentType::iter() {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
