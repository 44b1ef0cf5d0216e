//! Component deduplication
//!
//! Two components are the same device when `(type, vendor, model)` match.
//! Identifiers are not part of the key: one query path may report a
//! device with a bus id and another without.

use std::collections::HashSet;

use crate::hardware::HardwareComponent;
use crate::types::ComponentType;

/// Remove duplicate components, keeping the first occurrence of each.
///
/// Stable: survivors keep their original relative order.
pub fn dedup_components(components: Vec<HardwareComponent>) -> Vec<HardwareComponent> {
    let mut seen: HashSet<(ComponentType, String, String)> = HashSet::new();
    let before = components.len();

    let unique: Vec<HardwareComponent> = components
        .into_iter()
        .filter(|c| seen.insert((c.component_type, c.vendor.clone(), c.model.clone())))
        .collect();

    if unique.len() != before {
        tracing::debug!("Dropped {} duplicate component(s)", before - unique.len());
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::normalize::DeviceIds;

    fn gpu(model: &str) -> HardwareComponent {
        HardwareComponent::new(ComponentType::Gpu, "NVIDIA", model)
    }

    #[test]
    fn test_first_occurrence_wins() {
        let a = gpu("GeForce GTX 1050 Ti").with_ids(DeviceIds::new("10de", "1c82").unwrap());
        let b = HardwareComponent::new(ComponentType::Audio, "Realtek", "ALC295");
        let a_again = gpu("GeForce GTX 1050 Ti");

        let result = dedup_components(vec![a.clone(), b.clone(), a_again]);
        assert_eq!(result, vec![a, b]);
    }

    #[test]
    fn test_type_is_part_of_key() {
        let net = HardwareComponent::new(ComponentType::Network, "Intel", "AX201");
        let wifi = HardwareComponent::new(ComponentType::Wifi, "Intel", "AX201");
        assert_eq!(dedup_components(vec![net, wifi]).len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![gpu("A"), gpu("B"), gpu("A"), gpu("C"), gpu("B")];
        let once = dedup_components(input);
        let twice = dedup_components(once.clone());
        assert_eq!(once, twice);
        let models: Vec<&str> = once.iter().map(|c| c.model.as_str()).collect();
        assert_eq!(models, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty() {
        assert!(dedup_components(Vec::new()).is_empty());
    }
}
