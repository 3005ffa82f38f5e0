//! Site and deployment sizing
//!
//! Ties scoring, validation and allocation together. The engine owns its
//! configuration explicitly and never reads global state, so one engine can
//! size any number of sites.

use crate::allocator::allocate;
use crate::catalog::{default_capacity_table, default_method_weights, DEFAULT_MAX_LOAD_PERCENT};
use crate::deployment::{Deployment, Site};
use crate::error::{Result, SizingError};
use crate::models::{
    AllocationResult, CapacityTable, DeviceInventory, Dimension, LogSources, MethodWeights,
};
use crate::observability::{SizingLogger, SizingMetrics};
use crate::score::{compute_eps, compute_load, load_breakdown};
use crate::validation::{validate, validate_log_sources, ValidationWarning};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Lowest accepted max-load threshold (percent)
pub const MIN_MAX_LOAD_PERCENT: f64 = 1.0;

/// Threshold and failover settings for a sizing run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingOptions {
    pub max_load_percent: f64,
    pub enable_polling_failover: bool,
    pub enable_logs_failover: bool,
}

impl Default for SizingOptions {
    fn default() -> Self {
        Self {
            max_load_percent: DEFAULT_MAX_LOAD_PERCENT,
            enable_polling_failover: false,
            enable_logs_failover: false,
        }
    }
}

/// Load contributed by one device type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceLoad {
    pub device: String,
    pub count: u32,
    pub load: f64,
}

/// Sizing result for one site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteReport {
    pub name: String,
    pub total_load: f64,
    pub total_eps: f64,
    /// Polling collectors, sized on load
    pub polling: AllocationResult,
    /// Log collectors, sized on EPS
    pub logs: AllocationResult,
    pub breakdown: Vec<DeviceLoad>,
    pub warnings: Vec<ValidationWarning>,
}

impl SiteReport {
    pub fn total_collectors(&self) -> usize {
        self.polling.total_count() + self.logs.total_count()
    }
}

/// Consolidated sizing across all sites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupReport {
    pub total_load: f64,
    pub total_eps: f64,
    pub polling: AllocationResult,
    pub logs: AllocationResult,
    /// Sum of collectors across the per-site plans
    pub total_site_collectors: usize,
}

/// Sizing result for a whole deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentReport {
    pub name: String,
    pub max_load_percent: f64,
    pub sites: Vec<SiteReport>,
    pub rollup: RollupReport,
}

/// Sizes sites against a fixed weight table, capacity table and options
#[derive(Clone)]
pub struct SizingEngine {
    weights: MethodWeights,
    capacities: CapacityTable,
    options: SizingOptions,
    logger: SizingLogger,
    metrics: SizingMetrics,
}

impl SizingEngine {
    /// Create an engine, rejecting a max load outside `[MIN_MAX_LOAD_PERCENT, 100]`
    pub fn new(
        weights: MethodWeights,
        capacities: CapacityTable,
        options: SizingOptions,
    ) -> Result<Self> {
        let max_load = options.max_load_percent;
        if !(MIN_MAX_LOAD_PERCENT..=100.0).contains(&max_load) {
            return Err(SizingError::InvalidMaxLoad(max_load));
        }

        Ok(Self {
            weights,
            capacities,
            options,
            logger: SizingLogger::new(""),
            metrics: SizingMetrics::new(),
        })
    }

    /// Engine with the built-in weights and capacity table
    pub fn with_defaults(options: SizingOptions) -> Result<Self> {
        Self::new(default_method_weights(), default_capacity_table(), options)
    }

    /// Engine configured from a deployment file's settings
    pub fn from_deployment(deployment: &Deployment) -> Result<Self> {
        let mut engine = Self::new(
            deployment.method_weights.clone(),
            deployment.capacities.clone(),
            deployment.options(),
        )?;
        engine.logger = SizingLogger::new(&deployment.name);
        Ok(engine)
    }

    /// Size one site; its failover flags override the engine's
    pub fn size_site(&self, site: &Site) -> SiteReport {
        let polling_failover = site
            .enable_polling_failover
            .unwrap_or(self.options.enable_polling_failover);
        let logs_failover = site
            .enable_logs_failover
            .unwrap_or(self.options.enable_logs_failover);

        self.size_inventory(
            &site.name,
            &site.devices,
            &site.log_sources,
            polling_failover,
            logs_failover,
        )
    }

    /// Size an inventory with explicit failover flags
    pub fn size_inventory(
        &self,
        name: &str,
        devices: &DeviceInventory,
        log_sources: &LogSources,
        polling_failover: bool,
        logs_failover: bool,
    ) -> SiteReport {
        let start = Instant::now();

        let mut warnings = validate(devices, &self.weights);
        warnings.extend(validate_log_sources(log_sources));

        let total_load = compute_load(devices, &self.weights);
        let total_eps = compute_eps(log_sources);

        let polling = self.allocate(total_load, Dimension::Weight, polling_failover);
        let logs = self.allocate(total_eps, Dimension::Eps, logs_failover);

        let breakdown = load_breakdown(devices, &self.weights)
            .into_iter()
            .map(|(device, load)| DeviceLoad {
                count: devices.get(&device).map(|e| e.count).unwrap_or(0),
                device,
                load,
            })
            .collect();

        let report = SiteReport {
            name: name.to_string(),
            total_load,
            total_eps,
            polling,
            logs,
            breakdown,
            warnings,
        };

        self.metrics
            .observe_calculation_latency(start.elapsed().as_secs_f64());
        self.metrics.inc_calculations();
        self.metrics.add_warnings(report.warnings.len());
        self.metrics.set_collectors(&report.polling);
        self.metrics.set_collectors(&report.logs);

        self.logger.log_warnings(name, &report.warnings);
        for allocation in [&report.polling, &report.logs] {
            if !allocation.is_required() {
                self.logger.log_not_required(name, allocation.dimension);
            }
        }
        self.logger.log_site_sized(&report);

        report
    }

    /// Size every site and the consolidated total.
    ///
    /// The rollup allocates once on the summed load and EPS using the
    /// engine-level failover flags.
    pub fn size_deployment(&self, name: &str, sites: &[Site]) -> DeploymentReport {
        let site_reports: Vec<SiteReport> = sites.iter().map(|s| self.size_site(s)).collect();

        let total_load: f64 = site_reports.iter().map(|r| r.total_load).sum();
        let total_eps: f64 = site_reports.iter().map(|r| r.total_eps).sum();
        let total_site_collectors = site_reports.iter().map(|r| r.total_collectors()).sum();

        let rollup = RollupReport {
            total_load,
            total_eps,
            polling: self.allocate(
                total_load,
                Dimension::Weight,
                self.options.enable_polling_failover,
            ),
            logs: self.allocate(total_eps, Dimension::Eps, self.options.enable_logs_failover),
            total_site_collectors,
        };

        let report = DeploymentReport {
            name: name.to_string(),
            max_load_percent: self.options.max_load_percent,
            sites: site_reports,
            rollup,
        };
        self.logger.log_deployment_sized(&report);

        report
    }

    fn allocate(&self, demand: f64, dimension: Dimension, redundancy: bool) -> AllocationResult {
        allocate(
            demand,
            &self.capacities,
            dimension,
            self.options.max_load_percent,
            redundancy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceTypeEntry, UnitCapacity, UnitKind};

    fn engine(options: SizingOptions) -> SizingEngine {
        let weights = MethodWeights::from([("Script".to_string(), 5.0)]);
        let capacities = CapacityTable::new(vec![
            UnitCapacity::new("SMALL", 21286.0, 7800.0),
            UnitCapacity::new("MEDIUM", 48557.0, 12000.0),
        ])
        .unwrap();
        SizingEngine::new(weights, capacities, options).unwrap()
    }

    fn site(name: &str, count: u32, eps: f64) -> Site {
        Site {
            name: name.to_string(),
            devices: DeviceInventory::from([(
                "Linux Servers".to_string(),
                DeviceTypeEntry::new(count, 100.0).with_method("Script", 1.0),
            )]),
            log_sources: LogSources::from([("syslog".to_string(), eps)]),
            enable_polling_failover: None,
            enable_logs_failover: None,
        }
    }

    #[test]
    fn test_rejects_invalid_max_load() {
        for max_load in [0.0, 1e-15, 0.5, -5.0, 100.5, f64::NAN, f64::INFINITY] {
            let options = SizingOptions {
                max_load_percent: max_load,
                ..SizingOptions::default()
            };
            assert!(SizingEngine::with_defaults(options).is_err());
        }
    }

    #[test]
    fn test_accepts_max_load_bounds() {
        for max_load in [MIN_MAX_LOAD_PERCENT, 50.0, 100.0] {
            let options = SizingOptions {
                max_load_percent: max_load,
                ..SizingOptions::default()
            };
            assert!(SizingEngine::with_defaults(options).is_ok());
        }
    }

    #[test]
    fn test_lowest_max_load_sizes_site() {
        let options = SizingOptions {
            max_load_percent: MIN_MAX_LOAD_PERCENT,
            ..SizingOptions::default()
        };
        let report = engine(options).size_site(&site("Tiny", 1, 1.0));

        // 500 load at 1% of MEDIUM (485.57) needs 2 units
        assert_eq!(report.polling.primary_count(), 2);
        assert_eq!(report.logs.primary_count(), 1);
    }

    #[test]
    fn test_size_site() {
        let report = engine(SizingOptions::default()).size_site(&site("HQ", 10, 5000.0));

        assert_eq!(report.total_load, 5000.0);
        assert_eq!(report.total_eps, 5000.0);
        assert_eq!(report.polling.size, "MEDIUM");
        assert_eq!(report.polling.primary_count(), 1);
        // SMALL: ceil(5000 / 6630) = 1, MEDIUM also 1, MEDIUM wins the tie
        assert_eq!(report.logs.size, "MEDIUM");
        assert_eq!(report.breakdown.len(), 1);
        assert_eq!(report.breakdown[0].count, 10);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_site_failover_overrides_engine() {
        let options = SizingOptions {
            enable_polling_failover: true,
            ..SizingOptions::default()
        };
        let engine = engine(options);

        let inherited = engine.size_site(&site("A", 10, 0.0));
        assert_eq!(inherited.polling.standby_count(), 1);
        assert_eq!(inherited.logs.total_count(), 0);

        let mut overridden = site("B", 10, 0.0);
        overridden.enable_polling_failover = Some(false);
        overridden.enable_logs_failover = Some(true);
        let report = engine.size_site(&overridden);
        assert_eq!(report.polling.standby_count(), 0);
        assert_eq!(report.logs.primary_count(), 0);
        assert_eq!(report.logs.units[0].kind, UnitKind::RedundancyStandby);
    }

    #[test]
    fn test_deployment_rollup() {
        let engine = engine(SizingOptions::default());
        let sites = vec![site("A", 30, 4000.0), site("B", 30, 4000.0)];

        let report = engine.size_deployment("acme", &sites);

        assert_eq!(report.sites.len(), 2);
        assert_eq!(report.rollup.total_load, 30000.0);
        assert_eq!(report.rollup.total_eps, 8000.0);
        // Each site: 15000 load -> 1 MEDIUM, 4000 eps -> 1 MEDIUM
        assert_eq!(report.rollup.total_site_collectors, 4);
        // Consolidated: 30000 load -> 1 MEDIUM, 8000 eps -> 1 MEDIUM
        assert_eq!(report.rollup.polling.primary_count(), 1);
        assert_eq!(report.rollup.logs.primary_count(), 1);
    }

    #[test]
    fn test_warnings_attached_to_report() {
        let mut bad = site("C", 1, 10.0);
        bad.devices.insert(
            "Custom".to_string(),
            DeviceTypeEntry::new(1, 10.0).with_method("Unknown", 1.0),
        );

        let report = engine(SizingOptions::default()).size_site(&bad);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.total_load, 500.0);
    }

    #[test]
    fn test_report_serializes() {
        let report = engine(SizingOptions::default()).size_site(&site("HQ", 1, 1.0));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["name"], "HQ");
        assert_eq!(json["polling"]["dimension"], "weight");
        assert_eq!(json["logs"]["units"][0]["kind"], "primary");
    }
}
