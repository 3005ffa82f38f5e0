//! Load and EPS scoring
//!
//! Reduces a device inventory to a single load score using the method
//! weight table, and log categories to a flat EPS total.

use crate::models::{DeviceInventory, DeviceTypeEntry, LogSources, MethodWeights};

/// Load contributed by one device type.
///
/// Zero-count entries return 0 without looking at their methods. Methods
/// missing from `weights` count as weight 0.
pub fn device_load(entry: &DeviceTypeEntry, weights: &MethodWeights) -> f64 {
    if entry.count == 0 {
        return 0.0;
    }

    let per_device: f64 = entry
        .methods
        .iter()
        .map(|(method, ratio)| {
            let weight = weights.get(method).copied().unwrap_or(0.0);
            entry.instances * ratio * weight
        })
        .sum();

    per_device * entry.count as f64
}

/// Total load score of an inventory
pub fn compute_load(devices: &DeviceInventory, weights: &MethodWeights) -> f64 {
    devices
        .values()
        .map(|entry| device_load(entry, weights))
        .sum()
}

/// Load per device type, in inventory order
pub fn load_breakdown(devices: &DeviceInventory, weights: &MethodWeights) -> Vec<(String, f64)> {
    devices
        .iter()
        .map(|(name, entry)| (name.clone(), device_load(entry, weights)))
        .collect()
}

/// Total events per second; an unweighted sum
pub fn compute_eps(sources: &LogSources) -> f64 {
    sources.values().sum()
}
