//! Compatibility report
//!
//! The read-only value handed to the report sink: system metadata, the tally,
//! the score and readiness label, and every component with its result in
//! detection order. Built once by [`aggregate`](crate::logic::aggregate).

pub mod sink;

use serde::Serialize;
use std::fs;
use strum::{Display, EnumString};

use crate::compat::CompatibilityResult;
use crate::environment::{Environment, detect_environment};
use crate::hardware::HardwareComponent;
use crate::types::Compatibility;

/// Overall readiness label derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
pub enum Readiness {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Readiness {
    /// Inclusive lower bounds, checked highest first.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 75.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Per-bucket component counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub compatible: usize,
    pub partial: usize,
    pub incompatible: usize,
    pub unknown: usize,
}

impl Summary {
    /// Count one tier into its bucket.
    pub fn record(&mut self, tier: Compatibility) {
        self.total += 1;
        match tier {
            Compatibility::Works => self.compatible += 1,
            Compatibility::Partial => self.partial += 1,
            Compatibility::Broken => self.incompatible += 1,
            Compatibility::Unknown => self.unknown += 1,
        }
    }

    /// `(compatible + 0.5 × partial) / total × 100`, `None` when empty.
    pub fn score(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        // (2c + p) * 50 / total keeps round inputs exact
        let weighted = (2 * self.compatible + self.partial) as f64;
        Some(weighted * 50.0 / self.total as f64)
    }
}

/// Facts about the machine the scan ran on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    /// OS family (`linux`, `windows`, ...)
    pub os: String,
    /// Distribution or edition name if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_name: Option<String>,
    pub arch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub environment: Environment,
    /// RFC 3339 timestamp of the scan
    pub generated_at: String,
}

impl SystemInfo {
    /// Gather metadata about the current host.
    pub fn collect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            os_name: read_os_release_name(),
            arch: std::env::consts::ARCH.to_string(),
            hostname: hostname(),
            environment: detect_environment(),
            generated_at: chrono::Local::now().to_rfc3339(),
        }
    }
}

fn read_os_release_name() -> Option<String> {
    let content = fs::read_to_string("/etc/os-release").ok()?;
    parse_os_release_name(&content)
}

/// `PRETTY_NAME` from os-release content, quotes removed.
pub fn parse_os_release_name(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(unix)]
fn hostname() -> Option<String> {
    nix::unistd::gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
}

#[cfg(not(unix))]
fn hostname() -> Option<String> {
    std::env::var("COMPUTERNAME").ok()
}

/// One component and how it resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub component: HardwareComponent,
    pub result: CompatibilityResult,
}

/// Finished compatibility report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub system: SystemInfo,
    pub summary: Summary,
    /// `None` when no components were detected
    pub score: Option<f64>,
    pub readiness: Option<Readiness>,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Components whose tier is partial, broken or unknown, in detection order.
    pub fn attention(&self) -> Vec<&ReportEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.result.compatibility().needs_attention())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readiness_thresholds_inclusive() {
        assert_eq!(Readiness::from_score(100.0), Readiness::Excellent);
        assert_eq!(Readiness::from_score(90.0), Readiness::Excellent);
        assert_eq!(Readiness::from_score(89.99), Readiness::Good);
        assert_eq!(Readiness::from_score(75.0), Readiness::Good);
        assert_eq!(Readiness::from_score(50.0), Readiness::Fair);
        assert_eq!(Readiness::from_score(49.9), Readiness::Poor);
        assert_eq!(Readiness::from_score(0.0), Readiness::Poor);
    }

    #[test]
    fn test_summary_buckets() {
        let mut summary = Summary::default();
        for tier in [
            Compatibility::Works,
            Compatibility::Partial,
            Compatibility::Broken,
            Compatibility::Unknown,
            Compatibility::Works,
        ] {
            summary.record(tier);
        }
        assert_eq!(
            summary,
            Summary {
                total: 5,
                compatible: 2,
                partial: 1,
                incompatible: 1,
                unknown: 1
            }
        );
    }

    #[test]
    fn test_score_empty_is_none() {
        assert_eq!(Summary::default().score(), None);
    }

    #[test]
    fn test_score_weights_partial_half() {
        let summary = Summary {
            total: 4,
            compatible: 1,
            partial: 2,
            incompatible: 1,
            unknown: 0,
        };
        assert_eq!(summary.score(), Some(50.0));
    }

    #[test]
    fn test_parse_os_release_name() {
        let content = "NAME=\"Fedora Linux\"\nPRETTY_NAME=\"Fedora Linux 40 (Workstation Edition)\"\n";
        assert_eq!(
            parse_os_release_name(content).as_deref(),
            Some("Fedora Linux 40 (Workstation Edition)")
        );
        assert_eq!(parse_os_release_name("NAME=Arch\n"), None);
    }

    #[test]
    fn test_system_info_collect_runs() {
        let info = SystemInfo::collect();
        assert_eq!(info.os, std::env::consts::OS);
        assert!(!info.generated_at.is_empty());
    }
}
