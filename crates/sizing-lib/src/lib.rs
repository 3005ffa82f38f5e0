//! Collector sizing library
//!
//! This crate provides the core functionality for:
//! - Load and EPS scoring of a device inventory
//! - Capacity allocation across discrete collector sizes
//! - Inventory validation
//! - Deployment file import/export
//! - Structured logging and metrics

pub mod allocator;
pub mod calculator;
pub mod catalog;
pub mod deployment;
pub mod error;
pub mod models;
pub mod observability;
pub mod score;
pub mod validation;

pub use allocator::{allocate, needed_units};
pub use calculator::{
    DeploymentReport, DeviceLoad, RollupReport, SiteReport, SizingEngine, SizingOptions,
    MIN_MAX_LOAD_PERCENT,
};
pub use deployment::{Deployment, Site};
pub use error::{Result, SizingError};
pub use models::*;
pub use observability::{SizingLogger, SizingMetrics};
pub use score::{compute_eps, compute_load, device_load, load_breakdown};
pub use validation::{validate, validate_log_sources, ValidationWarning};
