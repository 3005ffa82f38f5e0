//! Inventory validation
//!
//! Scoring tolerates bad data silently. This pass reports the same problems
//! as advisory warnings so callers can surface them.

use crate::models::{DeviceInventory, LogSources, MethodWeights};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Allowed deviation of a device's method ratios from 1.0
pub const RATIO_SUM_TOLERANCE: f64 = 0.01;

/// Data-quality issue found in an inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// Method ratios do not add up to 1.0
    RatioSum { device: String, sum: f64 },
    /// Method has no entry in the weight table
    UnknownMethod { device: String, method: String },
    /// Ratio outside `[0, 1]`
    RatioOutOfRange {
        device: String,
        method: String,
        ratio: f64,
    },
    /// Negative or non-finite numeric field
    InvalidNumber { device: String, field: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::RatioSum { device, sum } => write!(
                f,
                "{}: collection method ratios sum to {:.2}, expected 1.00",
                device, sum
            ),
            ValidationWarning::UnknownMethod { device, method } => write!(
                f,
                "{}: method '{}' has no weight and contributes no load",
                device, method
            ),
            ValidationWarning::RatioOutOfRange {
                device,
                method,
                ratio,
            } => write!(
                f,
                "{}: ratio {} for method '{}' is outside 0..1",
                device, ratio, method
            ),
            ValidationWarning::InvalidNumber { device, field } => {
                write!(f, "{}: {} is negative or not a number", device, field)
            }
        }
    }
}

fn is_invalid(value: f64) -> bool {
    !value.is_finite() || value < 0.0
}

/// Check an inventory against the weight table.
///
/// Device types with a zero count are only checked for invalid numbers.
pub fn validate(devices: &DeviceInventory, weights: &MethodWeights) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (device, entry) in devices {
        if is_invalid(entry.instances) {
            warnings.push(ValidationWarning::InvalidNumber {
                device: device.clone(),
                field: "instances".to_string(),
            });
        }

        for (method, ratio) in &entry.methods {
            if is_invalid(*ratio) {
                warnings.push(ValidationWarning::InvalidNumber {
                    device: device.clone(),
                    field: format!("methods.{}", method),
                });
            }
        }

        if entry.count == 0 {
            continue;
        }

        for (method, ratio) in &entry.methods {
            if ratio.is_finite() && !(0.0..=1.0).contains(ratio) {
                warnings.push(ValidationWarning::RatioOutOfRange {
                    device: device.clone(),
                    method: method.clone(),
                    ratio: *ratio,
                });
            }
            if !weights.contains_key(method) {
                warnings.push(ValidationWarning::UnknownMethod {
                    device: device.clone(),
                    method: method.clone(),
                });
            }
        }

        let sum: f64 = entry.methods.values().sum();
        if sum.is_finite() && (sum - 1.0).abs() > RATIO_SUM_TOLERANCE {
            warnings.push(ValidationWarning::RatioSum {
                device: device.clone(),
                sum,
            });
        }
    }

    warnings
}

/// Check log source rates for negative or non-finite values
pub fn validate_log_sources(sources: &LogSources) -> Vec<ValidationWarning> {
    sources
        .iter()
        .filter(|(_, rate)| is_invalid(**rate))
        .map(|(name, _)| ValidationWarning::InvalidNumber {
            device: "log sources".to_string(),
            field: name.clone(),
        })
        .collect()
}
