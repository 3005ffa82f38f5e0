//! Capacity allocation
//!
//! Picks the collector size that needs the fewest units to hold a demand
//! under the max-load threshold, then lays out the primary units and an
//! optional standby.

use crate::models::{AllocatedUnit, AllocationResult, CapacityTable, Dimension};
use tracing::debug;

/// Units of one size needed to keep average utilization at or below
/// `max_load_percent`
pub fn needed_units(demand: f64, capacity: f64, max_load_percent: f64) -> u32 {
    (demand / (capacity * (max_load_percent / 100.0))).ceil() as u32
}

/// Allocate collectors for `demand` along one dimension.
///
/// Sizes are tried in table order and ties go to the size tried last. A zero
/// demand therefore selects the last size with no primary units. Performs no
/// validation of its own; `CapacityTable` guarantees positive capacities.
pub fn allocate(
    demand: f64,
    capacities: &CapacityTable,
    dimension: Dimension,
    max_load_percent: f64,
    redundancy_enabled: bool,
) -> AllocationResult {
    let mut best: Option<(&str, f64, u32)> = None;

    for unit in capacities.iter() {
        let capacity = unit.capacity(dimension);
        let needed = needed_units(demand, capacity, max_load_percent);

        if best.map_or(true, |(_, _, min)| needed <= min) {
            best = Some((unit.size.as_str(), capacity, needed));
        }
    }

    let Some((size, capacity, needed)) = best else {
        return AllocationResult {
            dimension,
            size: String::new(),
            units: Vec::new(),
        };
    };

    let mut units = Vec::with_capacity(needed as usize + usize::from(redundancy_enabled));
    if needed > 0 {
        let utilization = (demand / needed as f64 / capacity * 100.0).round() as u32;
        units.extend((0..needed).map(|_| AllocatedUnit::primary(utilization)));
    }
    if redundancy_enabled {
        units.push(AllocatedUnit::standby());
    }

    debug!(
        dimension = %dimension,
        demand,
        size,
        primary = needed,
        redundancy = redundancy_enabled,
        "Allocated collectors"
    );

    AllocationResult {
        dimension,
        size: size.to_string(),
        units,
    }
}
