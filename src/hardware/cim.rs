//! Structured Windows query through CIM.
//!
//! Asks PowerShell for `Get-CimInstance` results serialized as JSON, so no
//! column guessing is needed. This is the preferred Windows strategy; the
//! [`wmic`](super::wmic) parser is the fallback when PowerShell is missing.

use serde_json::Value;

use super::{DeviceCategory, HardwareQuery, RawDevice};
use crate::command::{program_available, run_query};
use crate::error::ProbeError;

const POWERSHELL: &str = "powershell";

/// WMI class and property names backing one device category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmiClass {
    pub class: &'static str,
    /// WQL filter restricting the instances
    pub filter: Option<&'static str>,
    pub id_property: Option<&'static str>,
    pub driver_property: Option<&'static str>,
    pub manufacturer_property: Option<&'static str>,
}

impl WmiClass {
    /// Properties to select, `Name` first.
    pub fn properties(&self) -> Vec<&'static str> {
        let mut props = vec!["Name"];
        props.extend(self.id_property);
        props.extend(self.driver_property);
        props.extend(self.manufacturer_property);
        props
    }
}

/// WMI class table shared by the CIM and wmic strategies.
pub fn wmi_class(category: DeviceCategory) -> WmiClass {
    match category {
        DeviceCategory::Gpu => WmiClass {
            class: "Win32_VideoController",
            filter: None,
            id_property: Some("PNPDeviceID"),
            driver_property: Some("DriverVersion"),
            manufacturer_property: Some("AdapterCompatibility"),
        },
        DeviceCategory::Network => WmiClass {
            class: "Win32_NetworkAdapter",
            filter: Some("PhysicalAdapter=TRUE"),
            id_property: Some("PNPDeviceID"),
            driver_property: None,
            manufacturer_property: Some("Manufacturer"),
        },
        DeviceCategory::Audio => WmiClass {
            class: "Win32_SoundDevice",
            filter: None,
            id_property: Some("PNPDeviceID"),
            driver_property: None,
            manufacturer_property: Some("Manufacturer"),
        },
        DeviceCategory::Cpu => WmiClass {
            class: "Win32_Processor",
            filter: None,
            id_property: None,
            driver_property: None,
            manufacturer_property: Some("Manufacturer"),
        },
    }
}

/// Returns true if PowerShell can be launched on this host.
pub fn powershell_available() -> bool {
    program_available(POWERSHELL, &["-NoProfile", "-NonInteractive", "-Command", "exit 0"])
}

/// CIM (PowerShell JSON) hardware query.
#[derive(Debug, Clone)]
pub struct CimQuery {
    program: String,
}

impl CimQuery {
    pub fn new() -> Self {
        Self {
            program: POWERSHELL.to_string(),
        }
    }

    /// PowerShell pipeline for one WMI class.
    pub fn script(class: &WmiClass) -> String {
        let mut script = format!("Get-CimInstance -ClassName {}", class.class);
        if let Some(filter) = class.filter {
            script.push_str(&format!(" -Filter \"{}\"", filter));
        }
        script.push_str(&format!(
            " | Select-Object {} | ConvertTo-Json -Compress",
            class.properties().join(",")
        ));
        script
    }
}

impl Default for CimQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareQuery for CimQuery {
    fn name(&self) -> &'static str {
        "cim"
    }

    fn enumerate(&self, category: DeviceCategory) -> Result<Vec<RawDevice>, ProbeError> {
        let class = wmi_class(category);
        let script = Self::script(&class);
        let output = run_query(
            &self.program,
            &["-NoProfile", "-NonInteractive", "-Command", &script],
        )?;
        parse_cim_json(&output, &class)
    }
}

/// Parse `ConvertTo-Json` output for one class.
///
/// PowerShell emits nothing for zero instances, a bare object for one, and an
/// array for several.
pub fn parse_cim_json(output: &str, class: &WmiClass) -> Result<Vec<RawDevice>, ProbeError> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| ProbeError::parse(format!("{} JSON: {}", class.class, e)))?;

    let instances = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(ProbeError::parse(format!(
                "{} JSON: expected object or array, got {}",
                class.class, other
            )));
        }
    };

    Ok(instances
        .iter()
        .filter_map(|instance| {
            let name = string_property(instance, "Name")?;
            Some(RawDevice {
                name,
                hardware_id: class.id_property.and_then(|p| string_property(instance, p)),
                driver_version: class.driver_property.and_then(|p| string_property(instance, p)),
                manufacturer: class
                    .manufacturer_property
                    .and_then(|p| string_property(instance, p)),
            })
        })
        .collect())
}

/// Non-empty string property, `None` for null/missing/blank.
fn string_property(instance: &Value, property: &str) -> Option<String> {
    instance
        .get(property)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
