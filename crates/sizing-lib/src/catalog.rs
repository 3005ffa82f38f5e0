//! Built-in collector sizes, method weights and device defaults

use crate::models::{CapacityTable, DeviceInventory, DeviceTypeEntry, MethodWeights, UnitCapacity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default max-load threshold (percent)
pub const DEFAULT_MAX_LOAD_PERCENT: f64 = 85.0;

/// Collector sizes, smallest first: (size, weight capacity, eps capacity)
const COLLECTOR_SIZES: &[(&str, f64, f64)] = &[
    ("SMALL", 21286.0, 7800.0),
    ("MEDIUM", 48557.0, 12000.0),
    ("LARGE", 113123.0, 15000.0),
    ("XL", 155889.0, 20000.0),
    ("XXL", 465576.0, 40000.0),
];

const METHOD_WEIGHTS: &[(&str, f64)] = &[
    ("SNMPv2", 0.8),
    ("SNMPv3", 1.0),
    ("HTTP", 0.5),
    ("WMI", 2.0),
    ("WinRM", 1.5),
    ("JMX", 1.2),
    ("JDBC", 2.5),
    ("Script", 5.0),
    ("Perfmon", 1.8),
    ("ESX", 1.0),
    ("Ping", 0.1),
];

/// Default instances and method mix for a device type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDefault {
    pub instances: f64,
    pub methods: BTreeMap<String, f64>,
}

impl DeviceDefault {
    fn new(instances: f64, methods: &[(&str, f64)]) -> Self {
        Self {
            instances,
            methods: methods
                .iter()
                .map(|(m, r)| (m.to_string(), *r))
                .collect(),
        }
    }
}

pub type DeviceDefaults = BTreeMap<String, DeviceDefault>;

pub fn default_capacity_table() -> CapacityTable {
    let units = COLLECTOR_SIZES
        .iter()
        .map(|(size, weight, eps)| UnitCapacity::new(*size, *weight, *eps))
        .collect();

    // Static table is non-empty with positive capacities
    CapacityTable::new(units).expect("built-in capacity table is valid")
}

pub fn default_method_weights() -> MethodWeights {
    METHOD_WEIGHTS
        .iter()
        .map(|(method, weight)| (method.to_string(), *weight))
        .collect()
}

pub fn default_device_defaults() -> DeviceDefaults {
    DeviceDefaults::from([
        (
            "Linux Servers".to_string(),
            DeviceDefault::new(25.0, &[("SNMPv3", 0.6), ("Script", 0.4)]),
        ),
        (
            "Windows Servers".to_string(),
            DeviceDefault::new(30.0, &[("WMI", 0.8), ("Perfmon", 0.2)]),
        ),
        (
            "Network Devices".to_string(),
            DeviceDefault::new(60.0, &[("SNMPv2", 0.7), ("SNMPv3", 0.3)]),
        ),
        (
            "Storage Arrays".to_string(),
            DeviceDefault::new(120.0, &[("HTTP", 0.7), ("SNMPv2", 0.3)]),
        ),
        (
            "Hypervisors".to_string(),
            DeviceDefault::new(80.0, &[("ESX", 1.0)]),
        ),
        (
            "Databases".to_string(),
            DeviceDefault::new(40.0, &[("JDBC", 0.8), ("Script", 0.2)]),
        ),
        (
            "Load Balancers".to_string(),
            DeviceDefault::new(50.0, &[("SNMPv2", 0.5), ("HTTP", 0.5)]),
        ),
        (
            "Firewalls".to_string(),
            DeviceDefault::new(35.0, &[("SNMPv3", 0.8), ("Ping", 0.2)]),
        ),
    ])
}

/// Zero-count inventory seeded from device defaults
pub fn inventory_from_defaults(defaults: &DeviceDefaults) -> DeviceInventory {
    defaults
        .iter()
        .map(|(name, default)| {
            (
                name.clone(),
                DeviceTypeEntry {
                    count: 0,
                    instances: default.instances,
                    methods: default.methods.clone(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;

    #[test]
    fn test_capacity_table_order() {
        let sizes: Vec<_> = default_capacity_table()
            .iter()
            .map(|u| u.size.clone())
            .collect();
        assert_eq!(sizes, vec!["SMALL", "MEDIUM", "LARGE", "XL", "XXL"]);
    }

    #[test]
    fn test_capacities_increase_with_size() {
        let table = default_capacity_table();
        let units: Vec<_> = table.iter().collect();
        for pair in units.windows(2) {
            assert!(pair[0].weight < pair[1].weight);
            assert!(pair[0].eps < pair[1].eps);
        }
    }

    #[test]
    fn test_defaults_reference_known_methods() {
        let weights = default_method_weights();
        let mut inventory = inventory_from_defaults(&default_device_defaults());
        for entry in inventory.values_mut() {
            entry.count = 1;
        }

        let warnings = validate(&inventory, &weights);
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn test_inventory_from_defaults_is_zero_count() {
        let inventory = inventory_from_defaults(&default_device_defaults());
        assert_eq!(inventory.len(), 8);
        assert!(inventory.values().all(|e| e.count == 0));
    }
}
