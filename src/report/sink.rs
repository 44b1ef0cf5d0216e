//! Report sink: JSON and plain-text rendering, and saving either to disk.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::Report;

/// Pretty-printed JSON document for the report.
pub fn to_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
}

/// Score as shown to humans: one decimal, or `N/A` with nothing detected.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.1}%", score),
        None => "N/A".to_string(),
    }
}

/// Plain-text report.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let system = &report.system;
    let summary = &report.summary;

    // Writing to a String cannot fail
    let _ = writeln!(out, "Linux Hardware Compatibility Report");
    let _ = writeln!(out, "===================================");
    let _ = writeln!(out, "Generated:   {}", system.generated_at);
    let _ = write!(out, "System:      {}", system.os_name.as_deref().unwrap_or(&system.os));
    let _ = writeln!(out, " ({})", system.arch);
    if let Some(hostname) = &system.hostname {
        let _ = writeln!(out, "Host:        {}", hostname);
    }
    let _ = writeln!(out, "Environment: {}", system.environment);
    let _ = writeln!(out);

    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "-------");
    let _ = writeln!(out, "Total components: {}", summary.total);
    let _ = writeln!(out, "Compatible:       {}", summary.compatible);
    let _ = writeln!(out, "Partial:          {}", summary.partial);
    let _ = writeln!(out, "Incompatible:     {}", summary.incompatible);
    let _ = writeln!(out, "Unknown:          {}", summary.unknown);
    let _ = writeln!(out, "Compatibility score: {}", format_score(report.score));
    if let Some(readiness) = report.readiness {
        let _ = writeln!(out, "Readiness: {}", readiness);
    }

    if report.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No components detected.");
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Components");
    let _ = writeln!(out, "----------");
    for entry in &report.entries {
        let _ = writeln!(out, "{}", entry.component);
        let _ = writeln!(out, "    Vendor: {}", entry.component.vendor);
        if let Some(driver) = &entry.component.driver {
            let _ = writeln!(out, "    Driver: {}", driver);
        }
        let _ = writeln!(out, "    Status: {}", entry.result);
        if let Some(notes) = entry.result.notes() {
            let _ = writeln!(out, "    Notes:  {}", notes);
        }
    }

    let attention = report.attention();
    if !attention.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Components requiring attention");
        let _ = writeln!(out, "------------------------------");
        for entry in attention {
            let _ = write!(
                out,
                "- {}: {}",
                entry.component,
                entry.result.compatibility()
            );
            match entry.result.notes() {
                Some(notes) => {
                    let _ = writeln!(out, " ({})", notes);
                }
                None => {
                    let _ = writeln!(out);
                }
            }
        }
    }

    out
}

/// Write the JSON report to `path`.
pub fn save_json<P: AsRef<Path>>(report: &Report, path: P) -> Result<()> {
    let json = to_json(report)?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write JSON report to {:?}", path.as_ref()))
}

/// Write the plain-text report to `path`.
pub fn save_text<P: AsRef<Path>>(report: &Report, path: P) -> Result<()> {
    fs::write(&path, render_text(report))
        .with_context(|| format!("Failed to write text report to {:?}", path.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::CompatibilityResult;
    use crate::environment::Environment;
    use crate::hardware::HardwareComponent;
    use crate::logic::aggregate::aggregate;
    use crate::logic::normalize::DeviceIds;
    use crate::report::SystemInfo;
    use crate::types::{ComponentType, Compatibility};

    fn system() -> SystemInfo {
        SystemInfo {
            os: "windows".into(),
            os_name: None,
            arch: "x86_64".into(),
            hostname: Some("DESKTOP-1".into()),
            environment: Environment::Foreign,
            generated_at: "2025-01-01T00:00:00+00:00".into(),
        }
    }

    fn sample() -> Report {
        aggregate(
            system(),
            vec![
                (
                    HardwareComponent::new(ComponentType::Gpu, "NVIDIA", "NVIDIA GeForce GTX 1050 Ti")
                        .with_ids(DeviceIds::new("10de", "1c82").unwrap())
                        .with_driver("31.0.15.3623"),
                    CompatibilityResult::estimated(
                        Compatibility::Partial,
                        Some("Proprietary driver recommended".into()),
                    ),
                ),
                (
                    HardwareComponent::new(ComponentType::Cpu, "Intel", "Intel Core i5"),
                    CompatibilityResult::remote(Compatibility::Works),
                ),
            ],
        )
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(Some(90.0)), "90.0%");
        assert_eq!(format_score(Some(66.666)), "66.7%");
        assert_eq!(format_score(None), "N/A");
    }

    #[test]
    fn test_render_text_sections() {
        let text = render_text(&sample());
        assert!(text.contains("System:      windows (x86_64)"));
        assert!(text.contains("Host:        DESKTOP-1"));
        assert!(text.contains("Compatibility score: 75.0%"));
        assert!(text.contains("Readiness: Good"));
        assert!(text.contains("[GPU] NVIDIA GeForce GTX 1050 Ti (10de:1c82)"));
        assert!(text.contains("Driver: 31.0.15.3623"));
        assert!(text.contains("Status: partial (estimated, fallback-table)"));
        assert!(text.contains(
            "- [GPU] NVIDIA GeForce GTX 1050 Ti (10de:1c82): partial (Proprietary driver recommended)"
        ));
        assert!(!text.contains("- [CPU]"));
    }

    #[test]
    fn test_render_text_empty() {
        let text = render_text(&aggregate(system(), Vec::new()));
        assert!(text.contains("Compatibility score: N/A"));
        assert!(text.contains("No components detected."));
        assert!(!text.contains("Readiness:"));
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();
        assert_eq!(json["summary"]["compatible"], 1);
        assert_eq!(json["summary"]["partial"], 1);
        assert_eq!(json["score"], 75.0);
        assert_eq!(json["readiness"], "Good");
        assert_eq!(json["system"]["environment"], "foreign");
        assert_eq!(json["entries"][0]["component"]["vendor_id"], "10de");
        assert_eq!(json["entries"][0]["result"]["source"], "fallback-table");
    }

    #[test]
    fn test_empty_json_score_is_null() {
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&aggregate(system(), Vec::new())).unwrap()).unwrap();
        assert!(json["score"].is_null());
        assert_eq!(json["summary"]["total"], 0);
    }

    #[test]
    fn test_save_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample();
        save_json(&report, dir.path().join("report.json")).unwrap();
        save_text(&report, dir.path().join("report.txt")).unwrap();

        let text = std::fs::read_to_string(dir.path().join("report.txt")).unwrap();
        assert!(text.starts_with("Linux Hardware Compatibility Report"));
        let json = std::fs::read_to_string(dir.path().join("report.json")).unwrap();
        assert!(json.contains("\"readiness\": \"Good\""));
    }

    #[test]
    fn test_save_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_json(&sample(), dir.path().join("missing/report.json"));
        assert!(err.is_err());
    }
}
