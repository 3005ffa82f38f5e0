//! Deployment configuration file
//!
//! JSON document carrying method weights, device defaults, capacity table
//! and per-site inventories across sessions.

use crate::calculator::{DeploymentReport, SizingEngine, SizingOptions};
use crate::catalog::{
    default_capacity_table, default_device_defaults, default_method_weights,
    inventory_from_defaults, DeviceDefaults, DEFAULT_MAX_LOAD_PERCENT,
};
use crate::error::{Result, SizingError};
use crate::models::{CapacityTable, DeviceInventory, LogSources, MethodWeights};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Newest file version this crate reads and the one it writes
pub const DEPLOYMENT_FILE_VERSION: u32 = 1;

/// Log categories every new site starts with
pub const DEFAULT_LOG_SOURCES: &[&str] = &["netflow", "syslog", "windowsEvents"];

/// One monitored location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub name: String,
    #[serde(default)]
    pub devices: DeviceInventory,
    #[serde(default)]
    pub log_sources: LogSources,
    /// Overrides the deployment-level polling failover when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_polling_failover: Option<bool>,
    /// Overrides the deployment-level logs failover when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_logs_failover: Option<bool>,
}

impl Site {
    /// Empty site seeded with zero-count devices and zero log rates
    pub fn from_defaults(name: impl Into<String>, defaults: &DeviceDefaults) -> Self {
        Self {
            name: name.into(),
            devices: inventory_from_defaults(defaults),
            log_sources: DEFAULT_LOG_SOURCES
                .iter()
                .map(|s| (s.to_string(), 0.0))
                .collect(),
            enable_polling_failover: None,
            enable_logs_failover: None,
        }
    }
}

fn default_version() -> u32 {
    DEPLOYMENT_FILE_VERSION
}

fn default_max_load() -> f64 {
    DEFAULT_MAX_LOAD_PERCENT
}

/// Deployment configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_max_load")]
    pub max_load_percent: f64,
    #[serde(default)]
    pub enable_polling_failover: bool,
    #[serde(default)]
    pub enable_logs_failover: bool,
    #[serde(default = "default_method_weights")]
    pub method_weights: MethodWeights,
    #[serde(default = "default_capacity_table")]
    pub capacities: CapacityTable,
    #[serde(default)]
    pub device_defaults: DeviceDefaults,
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

impl Deployment {
    /// Deployment with built-in defaults and a single empty site
    pub fn template() -> Self {
        let device_defaults = default_device_defaults();
        let site = Site::from_defaults("Main Site", &device_defaults);

        Self {
            version: DEPLOYMENT_FILE_VERSION,
            name: "New Deployment".to_string(),
            max_load_percent: DEFAULT_MAX_LOAD_PERCENT,
            enable_polling_failover: false,
            enable_logs_failover: false,
            method_weights: default_method_weights(),
            capacities: default_capacity_table(),
            device_defaults,
            sites: vec![site],
            exported_at: None,
        }
    }

    /// Parse a deployment document, rejecting newer file versions
    pub fn from_json(content: &str) -> Result<Self> {
        let deployment: Deployment = serde_json::from_str(content)?;

        if deployment.version > DEPLOYMENT_FILE_VERSION {
            return Err(SizingError::UnsupportedVersion {
                found: deployment.version,
                supported: DEPLOYMENT_FILE_VERSION,
            });
        }

        Ok(deployment)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a deployment file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SizingError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let deployment = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            deployment = %deployment.name,
            sites = deployment.sites.len(),
            "Loaded deployment file"
        );
        Ok(deployment)
    }

    /// Write the deployment, stamping `exported_at`
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.exported_at = Some(Utc::now());

        let content = self.to_json_pretty()?;
        std::fs::write(path, content).map_err(|source| SizingError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), deployment = %self.name, "Saved deployment file");
        Ok(())
    }

    pub fn options(&self) -> SizingOptions {
        SizingOptions {
            max_load_percent: self.max_load_percent,
            enable_polling_failover: self.enable_polling_failover,
            enable_logs_failover: self.enable_logs_failover,
        }
    }

    pub fn site(&self, name: &str) -> Option<&Site> {
        self.sites.iter().find(|s| s.name == name)
    }

    /// Size every site and the consolidated total
    pub fn calculate(&self) -> Result<DeploymentReport> {
        let engine = SizingEngine::from_deployment(self)?;
        Ok(engine.size_deployment(&self.name, &self.sites))
    }
}
