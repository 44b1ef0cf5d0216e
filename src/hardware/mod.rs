//! Hardware inventory
//!
//! Enumerates GPU, network, audio and CPU devices into uniform
//! [`HardwareComponent`] records.
//!
//! # Design
//!
//! - **Pluggable queries**: the platform collaborator is a [`HardwareQuery`];
//!   sysfs on Linux, CIM or wmic on Windows. All of them yield [`RawDevice`]s.
//! - **Category isolation**: a failing category is logged and contributes zero
//!   components. Detection never aborts the whole run.
//! - **Fatal only when nothing fits**: [`select_query`] is the single place
//!   that can fail, before any detection starts.

pub mod cim;
pub mod sysfs;
pub mod wmic;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::error::{ProbeError, Result, SwitcherooError};
use crate::logic::normalize::{DeviceIds, canonical_vendor, clean_model, extract_identifiers};
use crate::types::{ComponentType, ProbeStrategy};

pub use cim::CimQuery;
pub use sysfs::SysfsQuery;
pub use wmic::WmicQuery;

/// Device categories a query is asked to enumerate, in probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum DeviceCategory {
    Gpu,
    Network,
    Audio,
    Cpu,
}

/// One device as reported by the platform, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDevice {
    /// OS-reported device name
    pub name: String,
    /// Composite bus identifier, e.g. `PCI\VEN_10DE&DEV_1C82&...`
    pub hardware_id: Option<String>,
    /// Driver version (or module name) if the platform reports one
    pub driver_version: Option<String>,
    /// Manufacturer string if the platform reports one
    pub manufacturer: Option<String>,
}

impl RawDevice {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Platform hardware query collaborator.
///
/// Implementations enumerate one category at a time. Errors stay inside the
/// probe: [`detect_components`] logs them and moves on.
pub trait HardwareQuery {
    /// Short strategy name for logs and reports
    fn name(&self) -> &'static str;

    /// Enumerate raw records for one device category
    fn enumerate(&self, category: DeviceCategory) -> std::result::Result<Vec<RawDevice>, ProbeError>;
}

/// One detected device, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareComponent {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Canonical vendor name
    pub vendor: String,
    /// Descriptive model string
    pub model: String,
    /// Bus identifier pair, both halves or neither
    #[serde(flatten)]
    pub ids: Option<DeviceIds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Name exactly as the platform reported it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_name: Option<String>,
}

impl HardwareComponent {
    /// Create a component with no identifiers or driver information.
    pub fn new(component_type: ComponentType, vendor: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            component_type,
            vendor: vendor.into(),
            model: model.into(),
            ids: None,
            driver: None,
            platform_name: None,
        }
    }

    pub fn with_ids(mut self, ids: DeviceIds) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }
}

impl fmt::Display for HardwareComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.component_type, self.model)?;
        if let Some(ids) = &self.ids {
            write!(f, " ({})", ids)?;
        }
        Ok(())
    }
}

/// GPU names that belong to placeholder drivers and say nothing about the card.
pub const GENERIC_GPU_NAMES: &[&str] = &[
    "microsoft basic display adapter",
    "microsoft basic render driver",
    "standard vga graphics adapter",
];

/// Network adapter name fragments that mark a wireless adapter.
pub const WIRELESS_MARKERS: &[&str] = &["wireless", "wifi", "802.11"];

/// Returns true if the GPU model is a generic placeholder driver.
pub fn is_generic_gpu(model: &str) -> bool {
    let lowered = model.to_lowercase();
    GENERIC_GPU_NAMES.iter().any(|generic| lowered.contains(generic))
}

/// Classify a network adapter as WiFi or wired by its descriptive name.
pub fn classify_network(name: &str) -> ComponentType {
    let lowered = name.to_lowercase();
    if WIRELESS_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        ComponentType::Wifi
    } else {
        ComponentType::Network
    }
}

/// Normalize one raw record. Returns `None` for records that carry no signal.
pub fn build_component(category: DeviceCategory, raw: RawDevice) -> Option<HardwareComponent> {
    let model = clean_model(&raw.name);

    let component_type = match category {
        DeviceCategory::Gpu => {
            if is_generic_gpu(&model) {
                tracing::debug!("Skipping placeholder GPU driver: {}", model);
                return None;
            }
            ComponentType::Gpu
        }
        DeviceCategory::Network => classify_network(&model),
        DeviceCategory::Audio => ComponentType::Audio,
        DeviceCategory::Cpu => ComponentType::Cpu,
    };

    Some(HardwareComponent {
        component_type,
        vendor: canonical_vendor(&model),
        ids: raw.hardware_id.as_deref().and_then(extract_identifiers),
        driver: raw.driver_version.filter(|d| !d.trim().is_empty()),
        platform_name: Some(raw.name),
        model,
    })
}

/// Run every category through the query and normalize the results.
///
/// Output order follows [`DeviceCategory`] order, then the query's own order.
pub fn detect_components(query: &dyn HardwareQuery) -> Vec<HardwareComponent> {
    let mut components = Vec::new();

    for category in DeviceCategory::iter() {
        match query.enumerate(category) {
            Ok(records) => {
                tracing::debug!(
                    "{} query returned {} {} record(s)",
                    query.name(),
                    records.len(),
                    category
                );
                components.extend(
                    records
                        .into_iter()
                        .filter_map(|raw| build_component(category, raw)),
                );
            }
            Err(e) => {
                tracing::warn!("{} detection via {} failed: {}", category, query.name(), e);
            }
        }
    }

    tracing::info!("Detected {} component(s) via {}", components.len(), query.name());
    components
}

/// Pick the hardware query for this host.
///
/// An explicit strategy is honored as-is. `Auto` prefers sysfs, then CIM,
/// then wmic. Fails with `UnsupportedPlatform` when nothing applies.
pub fn select_query(strategy: ProbeStrategy) -> Result<Box<dyn HardwareQuery>> {
    match strategy {
        ProbeStrategy::Sysfs => Ok(Box::new(SysfsQuery::system())),
        ProbeStrategy::Cim => Ok(Box::new(CimQuery::new())),
        ProbeStrategy::Wmic => Ok(Box::new(WmicQuery::new())),
        ProbeStrategy::Auto => {
            if Path::new(sysfs::PCI_DEVICES_DIR).is_dir() {
                tracing::info!("Using sysfs hardware query");
                Ok(Box::new(SysfsQuery::system()))
            } else if cfg!(windows) && cim::powershell_available() {
                tracing::info!("Using CIM hardware query");
                Ok(Box::new(CimQuery::new()))
            } else if cfg!(windows) {
                tracing::info!("PowerShell unavailable, falling back to wmic");
                Ok(Box::new(WmicQuery::new()))
            } else {
                Err(SwitcherooError::unsupported_platform(format!(
                    "no hardware query available on {} (need Linux sysfs or Windows WMI)",
                    std::env::consts::OS
                )))
            }
        }
    }
}
