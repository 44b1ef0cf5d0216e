//! Windows fallback query: parses `wmic ... /format:csv` tables.
//!
//! wmic orders columns alphabetically and prepends `Node`, so parsing is
//! driven by the header row rather than by the requested property order.

use std::collections::HashMap;

use super::cim::{WmiClass, wmi_class};
use super::{DeviceCategory, HardwareQuery, RawDevice};
use crate::command::run_query;
use crate::error::ProbeError;

const WMIC: &str = "wmic";

/// wmic command-output hardware query.
#[derive(Debug, Clone)]
pub struct WmicQuery {
    program: String,
}

impl WmicQuery {
    pub fn new() -> Self {
        Self {
            program: WMIC.to_string(),
        }
    }

    /// Arguments for one WMI class.
    pub fn args(class: &WmiClass) -> Vec<String> {
        let mut args = vec!["path".to_string(), class.class.to_string()];
        if let Some(filter) = class.filter {
            args.push("where".to_string());
            args.push(filter.to_string());
        }
        args.push("get".to_string());
        args.push(class.properties().join(","));
        args.push("/format:csv".to_string());
        args
    }
}

impl Default for WmicQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareQuery for WmicQuery {
    fn name(&self) -> &'static str {
        "wmic"
    }

    fn enumerate(&self, category: DeviceCategory) -> Result<Vec<RawDevice>, ProbeError> {
        let class = wmi_class(category);
        let args = Self::args(&class);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = run_query(&self.program, &arg_refs)?;
        parse_wmic_csv(&output, &class)
    }
}

/// Parse wmic CSV output for one class.
///
/// Rows whose column count differs from the header (typically a name with an
/// embedded comma) are skipped. Output with no header at all is an error.
pub fn parse_wmic_csv(output: &str, class: &WmiClass) -> Result<Vec<RawDevice>, ProbeError> {
    let mut lines = output.lines().map(str::trim).filter(|line| !line.is_empty());

    let header = match lines.next() {
        Some(header) => header,
        // "No Instance(s) Available." goes to stderr, stdout stays empty
        None => return Ok(Vec::new()),
    };

    let columns: HashMap<String, usize> = header
        .split(',')
        .enumerate()
        .map(|(idx, column)| (column.trim().to_lowercase(), idx))
        .collect();
    let width = header.split(',').count();

    let name_idx = *columns
        .get("name")
        .ok_or_else(|| ProbeError::parse(format!("{}: no Name column in `{}`", class.class, header)))?;
    let column_of = |property: Option<&str>| property.and_then(|p| columns.get(&p.to_lowercase()).copied());
    let id_idx = column_of(class.id_property);
    let driver_idx = column_of(class.driver_property);
    let manufacturer_idx = column_of(class.manufacturer_property);

    let mut devices = Vec::new();
    for line in lines {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.len() != width {
            tracing::debug!("Skipping malformed {} row: {}", class.class, line);
            continue;
        }

        let cell = |idx: Option<usize>| {
            idx.map(|i| cells[i])
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let Some(name) = cell(Some(name_idx)) else {
            continue;
        };
        devices.push(RawDevice {
            name,
            hardware_id: cell(id_idx),
            driver_version: cell(driver_idx),
            manufacturer: cell(manufacturer_idx),
        });
    }

    Ok(devices)
}
