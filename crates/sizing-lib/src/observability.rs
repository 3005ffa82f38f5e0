//! Observability for sizing runs
//!
//! Provides:
//! - Prometheus metrics (calculation latency, calculations, warnings, recommended collectors)
//! - Structured logging with tracing

use crate::calculator::{DeploymentReport, SiteReport};
use crate::models::{AllocationResult, Dimension};
use crate::validation::ValidationWarning;
use prometheus::{
    register_histogram, register_int_counter, register_int_gauge_vec, Encoder, Histogram,
    IntCounter, IntGaugeVec, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for calculation latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05];

static GLOBAL_METRICS: OnceLock<SizingMetricsInner> = OnceLock::new();

struct SizingMetricsInner {
    calculation_latency_seconds: Histogram,
    calculations: IntCounter,
    warnings: IntCounter,
    collectors_recommended: IntGaugeVec,
}

impl SizingMetricsInner {
    fn new() -> Self {
        Self {
            calculation_latency_seconds: register_histogram!(
                "sizing_calculation_latency_seconds",
                "Time spent sizing a single site",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register calculation_latency_seconds"),

            calculations: register_int_counter!(
                "sizing_calculations_total",
                "Total number of site sizing calculations"
            )
            .expect("Failed to register calculations_total"),

            warnings: register_int_counter!(
                "sizing_warnings_total",
                "Total number of inventory validation warnings"
            )
            .expect("Failed to register warnings_total"),

            collectors_recommended: register_int_gauge_vec!(
                "sizing_collectors_recommended",
                "Collectors recommended by the most recent calculation",
                &["dimension", "kind"]
            )
            .expect("Failed to register collectors_recommended"),
        }
    }
}

/// Handle to the process-wide sizing metrics.
///
/// Clones share the same underlying registry entries.
#[derive(Clone)]
pub struct SizingMetrics {
    _private: (),
}

impl Default for SizingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SizingMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(SizingMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &SizingMetricsInner {
        GLOBAL_METRICS.get_or_init(SizingMetricsInner::new)
    }

    pub fn observe_calculation_latency(&self, duration_secs: f64) {
        self.inner().calculation_latency_seconds.observe(duration_secs);
    }

    pub fn inc_calculations(&self) {
        self.inner().calculations.inc();
    }

    pub fn add_warnings(&self, count: usize) {
        self.inner().warnings.inc_by(count as u64);
    }

    /// Publish unit counts of an allocation
    pub fn set_collectors(&self, allocation: &AllocationResult) {
        let dimension = allocation.dimension.as_str();
        let gauge = &self.inner().collectors_recommended;
        gauge
            .with_label_values(&[dimension, "primary"])
            .set(allocation.primary_count() as i64);
        gauge
            .with_label_values(&[dimension, "standby"])
            .set(allocation.standby_count() as i64);
    }

    /// Render all registered metrics in the Prometheus text format
    pub fn encode_text(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Structured logger for sizing events
#[derive(Clone)]
pub struct SizingLogger {
    deployment: String,
}

impl SizingLogger {
    pub fn new(deployment: impl Into<String>) -> Self {
        Self {
            deployment: deployment.into(),
        }
    }

    /// Log the result of sizing one site
    pub fn log_site_sized(&self, report: &SiteReport) {
        info!(
            event = "site_sized",
            deployment = %self.deployment,
            site = %report.name,
            total_load = report.total_load,
            total_eps = report.total_eps,
            polling_size = %size_label(&report.polling),
            polling_units = report.polling.total_count(),
            logs_size = %size_label(&report.logs),
            logs_units = report.logs.total_count(),
            warnings = report.warnings.len(),
            "Sized site"
        );
    }

    /// Log the global rollup of a deployment
    pub fn log_deployment_sized(&self, report: &DeploymentReport) {
        info!(
            event = "deployment_sized",
            deployment = %self.deployment,
            sites = report.sites.len(),
            total_load = report.rollup.total_load,
            total_eps = report.rollup.total_eps,
            polling_size = %size_label(&report.rollup.polling),
            polling_units = report.rollup.polling.total_count(),
            logs_size = %size_label(&report.rollup.logs),
            logs_units = report.rollup.logs.total_count(),
            total_site_collectors = report.rollup.total_site_collectors,
            "Sized deployment"
        );
    }

    /// Log each validation warning of a site
    pub fn log_warnings(&self, site: &str, warnings: &[ValidationWarning]) {
        for warning in warnings {
            warn!(
                event = "validation_warning",
                deployment = %self.deployment,
                site = %site,
                warning = %warning,
                "Inventory data-quality issue"
            );
        }
    }

    /// Log a dimension that needs no collectors
    pub fn log_not_required(&self, site: &str, dimension: Dimension) {
        info!(
            event = "dimension_not_required",
            deployment = %self.deployment,
            site = %site,
            dimension = %dimension,
            "No collectors required"
        );
    }
}

fn size_label(allocation: &AllocationResult) -> &str {
    allocation.display_size().unwrap_or("N/A")
}
