//! Identifier normalization
//!
//! Turns raw probe strings into the two keys the resolver works with:
//! the bus-level `(vendor_id, device_id)` pair and a canonical vendor name.
//!
//! Both extractions are total. Malformed input yields `None` / a fallback
//! name, never an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known vendor tokens, matched case-insensitively against device names.
///
/// Order is the tie-break: the first entry found in the name wins.
pub const KNOWN_VENDORS: &[(&str, &str)] = &[
    ("nvidia", "NVIDIA"),
    ("amd", "AMD"),
    ("intel", "Intel"),
    ("realtek", "Realtek"),
    ("broadcom", "Broadcom"),
    ("qualcomm", "Qualcomm"),
    ("microsoft", "Microsoft"),
];

/// Vendor name used when a device reports no name at all
pub const UNKNOWN_VENDOR: &str = "Unknown";

const VENDOR_MARKER: &str = "ven_";
const DEVICE_MARKER: &str = "dev_";
const ID_LEN: usize = 4;

/// A vendor/device identifier pair, both 4 lowercase hex digits.
///
/// The pair is only constructible from a complete parse, so a component
/// either carries both halves or neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceIds {
    vendor_id: String,
    device_id: String,
}

impl DeviceIds {
    /// Build a pair from two raw hex tokens.
    ///
    /// Returns `None` unless both are exactly four hex digits.
    pub fn new(vendor_id: &str, device_id: &str) -> Option<Self> {
        if is_hex_token(vendor_id) && is_hex_token(device_id) {
            Some(Self {
                vendor_id: vendor_id.to_ascii_lowercase(),
                device_id: device_id.to_ascii_lowercase(),
            })
        } else {
            None
        }
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }
}

impl fmt::Display for DeviceIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.vendor_id, self.device_id)
    }
}

fn is_hex_token(token: &str) -> bool {
    token.len() == ID_LEN && token.chars().all(|c| c.is_ascii_hexdigit())
}

/// Find the first 4-hex-digit token right after `marker` (already lowercase).
fn token_after(haystack: &str, marker: &str) -> Option<String> {
    haystack.match_indices(marker).find_map(|(idx, _)| {
        let start = idx + marker.len();
        haystack
            .get(start..start + ID_LEN)
            .filter(|token| is_hex_token(token))
            .map(str::to_string)
    })
}

/// Extract the `(vendor_id, device_id)` pair from a composite identifier.
///
/// Looks for `VEN_xxxx` and `DEV_xxxx` anywhere in the string, in any case,
/// e.g. `PCI\VEN_10DE&DEV_1C82&SUBSYS_37331458&REV_A1`. A string missing
/// either half yields `None`.
pub fn extract_identifiers(composite: &str) -> Option<DeviceIds> {
    // ASCII lowercasing keeps byte offsets aligned with the original
    let lowered = composite.to_ascii_lowercase();
    let vendor = token_after(&lowered, VENDOR_MARKER)?;
    let device = token_after(&lowered, DEVICE_MARKER)?;
    DeviceIds::new(&vendor, &device)
}

/// Derive a canonical vendor name from a free-text device name.
///
/// 1. First entry of [`KNOWN_VENDORS`] contained in the name (any case)
/// 2. Otherwise the first whitespace-delimited word of the name
/// 3. `"Unknown"` for an empty name
pub fn canonical_vendor(name: &str) -> String {
    let lowered = name.to_lowercase();
    if let Some((_, canonical)) = KNOWN_VENDORS
        .iter()
        .find(|(token, _)| lowered.contains(token))
    {
        return (*canonical).to_string();
    }

    name.split_whitespace()
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_VENDOR.to_string())
}

/// Collapse runs of whitespace so the same model reads the same everywhere.
pub fn clean_model(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_windows_pnp_id() {
        let ids = extract_identifiers(r"PCI\VEN_10DE&DEV_1C82&SUBSYS_37331458&REV_A1").unwrap();
        assert_eq!(ids.vendor_id(), "10de");
        assert_eq!(ids.device_id(), "1c82");
    }

    #[test]
    fn test_extract_is_case_insensitive() {
        let ids = extract_identifiers(r"pci\ven_8086&dev_A0F0").unwrap();
        assert_eq!(ids.to_string(), "8086:a0f0");
    }

    #[test]
    fn test_extract_missing_device_is_none() {
        assert_eq!(extract_identifiers(r"PCI\VEN_10DE&SUBSYS_0000"), None);
        assert_eq!(extract_identifiers(r"ROOT\DEV_1234"), None);
        assert_eq!(extract_identifiers(""), None);
    }

    #[test]
    fn test_extract_rejects_short_tokens() {
        assert_eq!(extract_identifiers("VEN_10&DEV_1C82"), None);
        assert_eq!(extract_identifiers("VEN_ZZZZ&DEV_1C82"), None);
    }

    #[test]
    fn test_extract_skips_bad_marker_occurrence() {
        // First VEN_ is garbage, second is valid
        let ids = extract_identifiers("VEN_XY&HDAUDIO\\VEN_10EC&DEV_0295").unwrap();
        assert_eq!(ids.to_string(), "10ec:0295");
    }

    #[test]
    fn test_extract_usb_style_is_none() {
        // USB uses VID_/PID_, which this normalizer does not read
        assert_eq!(extract_identifiers(r"USB\VID_0BDA&PID_8153"), None);
    }

    #[test]
    fn test_extract_handles_non_ascii() {
        assert_eq!(extract_identifiers("Gerät VEN_é"), None);
        let ids = extract_identifiers("é VEN_1002 ü DEV_73bf").unwrap();
        assert_eq!(ids.to_string(), "1002:73bf");
    }

    #[test]
    fn test_device_ids_new_validates() {
        assert!(DeviceIds::new("10DE", "1C82").is_some());
        assert!(DeviceIds::new("10DE", "1C8").is_none());
        assert!(DeviceIds::new("", "").is_none());
    }

    #[test]
    fn test_canonical_vendor_known_table() {
        assert_eq!(canonical_vendor("NVIDIA GeForce GTX 1050 Ti"), "NVIDIA");
        assert_eq!(canonical_vendor("Intel(R) Wi-Fi 6 AX201 160MHz"), "Intel");
        assert_eq!(canonical_vendor("Realtek High Definition Audio"), "Realtek");
        assert_eq!(canonical_vendor("Microsoft Hyper-V Video"), "Microsoft");
    }

    #[test]
    fn test_canonical_vendor_table_order_breaks_ties() {
        // Both "amd" and "nvidia" appear; nvidia comes first in the table
        assert_eq!(canonical_vendor("AMD chipset with NVIDIA graphics"), "NVIDIA");
    }

    #[test]
    fn test_canonical_vendor_first_word_fallback() {
        assert_eq!(canonical_vendor("FooCorp Turbo NIC"), "FooCorp");
        assert_eq!(canonical_vendor("   VIA  HD Audio"), "VIA");
    }

    #[test]
    fn test_canonical_vendor_empty_name() {
        assert_eq!(canonical_vendor(""), "Unknown");
        assert_eq!(canonical_vendor("   "), "Unknown");
    }

    #[test]
    fn test_clean_model() {
        assert_eq!(clean_model("  Intel(R)   Core(TM) i7  "), "Intel(R) Core(TM) i7");
    }
}
