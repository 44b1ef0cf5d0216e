//! Structured Linux query over sysfs and procfs.
//!
//! PCI devices come from `/sys/bus/pci/devices/*` (`class`, `vendor`,
//! `device`, bound `driver`), named through the `pci.ids` database when one is
//! installed. CPUs come from `/proc/cpuinfo`.
//!
//! The composite identifier is rendered as `PCI\VEN_xxxx&DEV_yyyy` so the
//! normalizer treats sysfs and WMI records the same way.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{DeviceCategory, HardwareQuery, RawDevice};
use crate::error::ProbeError;

/// Where the kernel lists PCI functions
pub const PCI_DEVICES_DIR: &str = "/sys/bus/pci/devices";

/// Install locations of the `pci.ids` database across distributions
pub const PCI_IDS_PATHS: &[&str] = &[
    "/usr/share/hwdata/pci.ids",
    "/usr/share/misc/pci.ids",
    "/usr/share/pci.ids",
];

/// Vendor names for common PCI vendor ids, used when `pci.ids` is missing.
const KNOWN_PCI_VENDORS: &[(&str, &str)] = &[
    ("10de", "NVIDIA Corporation"),
    ("1002", "Advanced Micro Devices, Inc. [AMD/ATI]"),
    ("1022", "Advanced Micro Devices, Inc. [AMD]"),
    ("8086", "Intel Corporation"),
    ("10ec", "Realtek Semiconductor Co., Ltd."),
    ("14e4", "Broadcom Inc. and subsidiaries"),
    ("168c", "Qualcomm Atheros"),
    ("17cb", "Qualcomm Technologies, Inc"),
    ("1414", "Microsoft Corporation"),
];

/// Parsed `pci.ids` vendor/device name database.
#[derive(Debug, Clone, Default)]
pub struct PciIds {
    vendors: HashMap<String, PciVendor>,
}

#[derive(Debug, Clone, Default)]
struct PciVendor {
    name: String,
    devices: HashMap<String, String>,
}

impl PciIds {
    /// Parse the vendor section of a `pci.ids` file.
    ///
    /// Subsystem lines are ignored; parsing stops at the device class section.
    pub fn parse(content: &str) -> Self {
        let mut vendors: HashMap<String, PciVendor> = HashMap::new();
        let mut current: Option<String> = None;

        for line in content.lines() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with("C ") {
                break;
            }

            if let Some(rest) = line.strip_prefix('\t') {
                if rest.starts_with('\t') {
                    continue;
                }
                if let (Some(vendor), Some((id, name))) = (&current, split_id_line(rest)) {
                    if let Some(entry) = vendors.get_mut(vendor) {
                        entry.devices.insert(id, name);
                    }
                }
            } else if let Some((id, name)) = split_id_line(line) {
                vendors.insert(
                    id.clone(),
                    PciVendor {
                        name,
                        devices: HashMap::new(),
                    },
                );
                current = Some(id);
            } else {
                current = None;
            }
        }

        Self { vendors }
    }

    /// Load the first `pci.ids` found in the standard locations.
    pub fn load_system() -> Option<Self> {
        PCI_IDS_PATHS.iter().find_map(|path| {
            fs::read_to_string(path).ok().map(|content| {
                tracing::debug!("Loaded PCI name database from {}", path);
                Self::parse(&content)
            })
        })
    }

    pub fn vendor_name(&self, vendor_id: &str) -> Option<&str> {
        self.vendors.get(vendor_id).map(|v| v.name.as_str())
    }

    pub fn device_name(&self, vendor_id: &str, device_id: &str) -> Option<&str> {
        self.vendors
            .get(vendor_id)
            .and_then(|v| v.devices.get(device_id))
            .map(String::as_str)
    }
}

/// Split `xxxx  Some Name` into a lowercase id and the name.
fn split_id_line(line: &str) -> Option<(String, String)> {
    let (id, name) = line.split_once(char::is_whitespace)?;
    if id.len() != 4 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some((id.to_ascii_lowercase(), name.trim().to_string()))
}

/// Linux sysfs/procfs hardware query.
#[derive(Debug, Clone)]
pub struct SysfsQuery {
    sys_root: PathBuf,
    proc_root: PathBuf,
    pci_ids: Option<PciIds>,
}

impl SysfsQuery {
    /// Query the running system.
    pub fn system() -> Self {
        Self {
            sys_root: PathBuf::from("/sys"),
            proc_root: PathBuf::from("/proc"),
            pci_ids: PciIds::load_system(),
        }
    }

    /// Query a sysfs/procfs tree rooted elsewhere.
    pub fn with_roots(sys_root: impl Into<PathBuf>, proc_root: impl Into<PathBuf>) -> Self {
        Self {
            sys_root: sys_root.into(),
            proc_root: proc_root.into(),
            pci_ids: None,
        }
    }

    pub fn with_pci_ids(mut self, pci_ids: PciIds) -> Self {
        self.pci_ids = Some(pci_ids);
        self
    }

    fn pci_devices(&self, category: DeviceCategory) -> Result<Vec<RawDevice>, ProbeError> {
        let dir = self.sys_root.join("bus/pci/devices");
        let entries = fs::read_dir(&dir).map_err(|source| ProbeError::Read {
            path: dir.display().to_string(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        paths.sort();

        Ok(paths
            .iter()
            .filter_map(|path| self.pci_device(path, category))
            .collect())
    }

    /// Read one PCI function, `None` if unreadable or of another category.
    fn pci_device(&self, path: &Path, category: DeviceCategory) -> Option<RawDevice> {
        let class = read_hex_attr(path, "class").and_then(|c| u32::from_str_radix(&c, 16).ok())?;
        if category_for_class(class) != Some(category) {
            return None;
        }

        let (Some(vendor_id), Some(device_id)) =
            (read_hex_attr(path, "vendor"), read_hex_attr(path, "device"))
        else {
            tracing::debug!("Skipping PCI device without ids: {}", path.display());
            return None;
        };

        let driver = fs::read_link(path.join("driver"))
            .ok()
            .and_then(|link| link.file_name().map(|n| n.to_string_lossy().into_owned()));
        let driver_version = driver.map(|module| {
            let version_file = self.sys_root.join("module").join(&module).join("version");
            match read_trimmed(&version_file) {
                Some(version) => format!("{} {}", module, version),
                None => module,
            }
        });

        Some(RawDevice {
            name: self.device_label(&vendor_id, &device_id),
            hardware_id: Some(format!(
                "PCI\\VEN_{}&DEV_{}",
                vendor_id.to_ascii_uppercase(),
                device_id.to_ascii_uppercase()
            )),
            driver_version,
            manufacturer: self.vendor_label(&vendor_id),
        })
    }

    fn vendor_label(&self, vendor_id: &str) -> Option<String> {
        self.pci_ids
            .as_ref()
            .and_then(|ids| ids.vendor_name(vendor_id))
            .or_else(|| {
                KNOWN_PCI_VENDORS
                    .iter()
                    .find(|(id, _)| *id == vendor_id)
                    .map(|(_, name)| *name)
            })
            .map(str::to_string)
    }

    fn device_label(&self, vendor_id: &str, device_id: &str) -> String {
        let vendor = self.vendor_label(vendor_id);
        let device = self
            .pci_ids
            .as_ref()
            .and_then(|ids| ids.device_name(vendor_id, device_id));

        match (vendor, device) {
            (Some(vendor), Some(device)) => format!("{} {}", vendor, device),
            (Some(vendor), None) => format!("{} device {}", vendor, device_id),
            (None, _) => format!("PCI device {}:{}", vendor_id, device_id),
        }
    }

    fn cpus(&self) -> Result<Vec<RawDevice>, ProbeError> {
        let path = self.proc_root.join("cpuinfo");
        let content = fs::read_to_string(&path).map_err(|source| ProbeError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(parse_cpuinfo(&content))
    }
}

impl HardwareQuery for SysfsQuery {
    fn name(&self) -> &'static str {
        "sysfs"
    }

    fn enumerate(&self, category: DeviceCategory) -> Result<Vec<RawDevice>, ProbeError> {
        match category {
            DeviceCategory::Cpu => self.cpus(),
            _ => self.pci_devices(category),
        }
    }
}

/// Map a 24-bit PCI class code to a probe category.
pub fn category_for_class(class: u32) -> Option<DeviceCategory> {
    match (class >> 16, class >> 8) {
        (0x03, _) => Some(DeviceCategory::Gpu),
        (0x02, _) => Some(DeviceCategory::Network),
        // multimedia audio, HD audio
        (_, 0x0401) | (_, 0x0403) => Some(DeviceCategory::Audio),
        _ => None,
    }
}

/// One record per distinct `model name`, in first-seen order.
pub fn parse_cpuinfo(content: &str) -> Vec<RawDevice> {
    let mut devices: Vec<RawDevice> = Vec::new();

    for block in content.split("\n\n") {
        let mut model = None;
        let mut vendor = None;
        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            match key.trim() {
                "model name" => model = Some(value.trim().to_string()),
                "vendor_id" => vendor = Some(value.trim().to_string()),
                _ => {}
            }
        }

        if let Some(name) = model.filter(|m| !m.is_empty()) {
            if !devices.iter().any(|d| d.name == name) {
                devices.push(RawDevice {
                    name,
                    hardware_id: None,
                    driver_version: None,
                    manufacturer: vendor,
                });
            }
        }
    }

    devices
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Read a `0x....` sysfs attribute as lowercase hex without the prefix.
fn read_hex_attr(dir: &Path, attr: &str) -> Option<String> {
    read_trimmed(&dir.join(attr)).map(|value| {
        value
            .trim_start_matches("0x")
            .trim_start_matches("0X")
            .to_ascii_lowercase()
    })
}
