//! Core data models for collector sizing

use crate::error::SizingError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One category of monitored device at a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTypeEntry {
    /// Number of devices of this type
    #[serde(default)]
    pub count: u32,
    /// Average monitored instances per device
    #[serde(default)]
    pub instances: f64,
    /// Fraction of instances collected through each method
    #[serde(default)]
    pub methods: BTreeMap<String, f64>,
}

impl DeviceTypeEntry {
    pub fn new(count: u32, instances: f64) -> Self {
        Self {
            count,
            instances,
            methods: BTreeMap::new(),
        }
    }

    /// Add a collection method with the given ratio
    pub fn with_method(mut self, method: impl Into<String>, ratio: f64) -> Self {
        self.methods.insert(method.into(), ratio);
        self
    }
}

/// Device inventory keyed by device type name
pub type DeviceInventory = BTreeMap<String, DeviceTypeEntry>;

/// Relative cost of each collection method
pub type MethodWeights = BTreeMap<String, f64>;

/// Raw event rates per log category (events per second)
pub type LogSources = BTreeMap<String, f64>;

/// Resource dimension a collector is sized against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Polling load score
    Weight,
    /// Events per second
    Eps,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Weight => "weight",
            Dimension::Eps => "eps",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discrete collector size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitCapacity {
    pub size: String,
    /// Load capacity at 100% utilization
    pub weight: f64,
    /// EPS capacity at 100% utilization
    pub eps: f64,
}

impl UnitCapacity {
    pub fn new(size: impl Into<String>, weight: f64, eps: f64) -> Self {
        Self {
            size: size.into(),
            weight,
            eps,
        }
    }

    /// Capacity along the given dimension
    pub fn capacity(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Weight => self.weight,
            Dimension::Eps => self.eps,
        }
    }
}

/// Ordered, non-empty table of collector sizes.
///
/// Order matters: allocation ties go to the size listed last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<UnitCapacity>", into = "Vec<UnitCapacity>")]
pub struct CapacityTable {
    units: Vec<UnitCapacity>,
}

impl CapacityTable {
    /// Build a table, rejecting empty tables, duplicate sizes and
    /// non-positive capacities
    pub fn new(units: Vec<UnitCapacity>) -> Result<Self, SizingError> {
        if units.is_empty() {
            return Err(SizingError::InvalidCapacityTable(
                "table has no sizes".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for unit in &units {
            if !seen.insert(unit.size.as_str()) {
                return Err(SizingError::InvalidCapacityTable(format!(
                    "duplicate size {}",
                    unit.size
                )));
            }
            for dimension in [Dimension::Weight, Dimension::Eps] {
                let value = unit.capacity(dimension);
                if !value.is_finite() || value <= 0.0 {
                    return Err(SizingError::InvalidCapacityTable(format!(
                        "size {} has non-positive {} capacity {}",
                        unit.size, dimension, value
                    )));
                }
            }
        }

        Ok(Self { units })
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitCapacity> {
        self.units.iter()
    }
}

impl TryFrom<Vec<UnitCapacity>> for CapacityTable {
    type Error = SizingError;

    fn try_from(units: Vec<UnitCapacity>) -> Result<Self, Self::Error> {
        Self::new(units)
    }
}

impl From<CapacityTable> for Vec<UnitCapacity> {
    fn from(table: CapacityTable) -> Self {
        table.units
    }
}

/// Role of an allocated collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Carries a share of the demand
    Primary,
    /// Held in reserve for failover, carries no demand
    RedundancyStandby,
}

/// One collector instance in an allocation plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedUnit {
    pub kind: UnitKind,
    /// Average utilization; may exceed 100
    pub utilization_percent: u32,
}

impl AllocatedUnit {
    pub fn primary(utilization_percent: u32) -> Self {
        Self {
            kind: UnitKind::Primary,
            utilization_percent,
        }
    }

    pub fn standby() -> Self {
        Self {
            kind: UnitKind::RedundancyStandby,
            utilization_percent: 0,
        }
    }
}

/// Allocation plan for one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub dimension: Dimension,
    /// Size used for every unit. Meaningless when no primary units exist.
    pub size: String,
    pub units: Vec<AllocatedUnit>,
}

impl AllocationResult {
    pub fn primary_count(&self) -> usize {
        self.units
            .iter()
            .filter(|u| u.kind == UnitKind::Primary)
            .count()
    }

    pub fn standby_count(&self) -> usize {
        self.units
            .iter()
            .filter(|u| u.kind == UnitKind::RedundancyStandby)
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.units.len()
    }

    /// True when the dimension carries any demand.
    ///
    /// Checks the primary count rather than the size, which is always set.
    pub fn is_required(&self) -> bool {
        self.primary_count() > 0
    }

    /// Size to display, or `None` when no collectors are required
    pub fn display_size(&self) -> Option<&str> {
        self.is_required().then_some(self.size.as_str())
    }

    /// Utilization shared by all primary units, if any
    pub fn primary_utilization(&self) -> Option<u32> {
        self.units
            .iter()
            .find(|u| u.kind == UnitKind::Primary)
            .map(|u| u.utilization_percent)
    }
}
