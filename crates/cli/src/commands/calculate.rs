//! Deployment sizing commands

use anyhow::{Context, Result};
use colored::Colorize;
use sizing_lib::{Deployment, DeploymentReport, SiteReport};
use std::path::Path;
use tabled::Tabled;

use crate::output::{
    color_utilization, format_allocation, format_number, format_timestamp, print_info,
    print_json, print_table, print_warning, OutputFormat,
};

/// Row for the per-site summary table
#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "Site")]
    name: String,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "Polling Collectors")]
    polling: String,
    #[tabled(rename = "Polling Util")]
    polling_util: String,
    #[tabled(rename = "EPS")]
    eps: String,
    #[tabled(rename = "Log Collectors")]
    logs: String,
    #[tabled(rename = "Logs Util")]
    logs_util: String,
    #[tabled(rename = "Warnings")]
    warnings: String,
}

/// Row for the device load breakdown table
#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Device Type")]
    device: String,
    #[tabled(rename = "Count")]
    count: u32,
    #[tabled(rename = "Load")]
    load: String,
    #[tabled(rename = "Share")]
    share: String,
}

/// Overrides applied on top of a deployment file
#[derive(Debug, Default, Clone)]
pub struct CalculateOverrides {
    pub site: Option<String>,
    pub max_load_percent: Option<f64>,
    pub polling_failover: bool,
    pub logs_failover: bool,
}

/// Size a deployment file
pub fn calculate(file: &Path, overrides: CalculateOverrides, format: OutputFormat) -> Result<()> {
    let mut deployment = Deployment::load(file)
        .with_context(|| format!("Failed to load deployment file {}", file.display()))?;

    if let Some(max_load) = overrides.max_load_percent {
        deployment.max_load_percent = max_load;
    }
    if overrides.polling_failover {
        deployment.enable_polling_failover = true;
    }
    if overrides.logs_failover {
        deployment.enable_logs_failover = true;
    }
    if let Some(name) = &overrides.site {
        let site = deployment
            .site(name)
            .cloned()
            .with_context(|| format!("Site '{}' not found in {}", name, file.display()))?;
        deployment.sites = vec![site];
    }

    let report = deployment
        .calculate()
        .context("Failed to size deployment")?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            if overrides.site.is_some() {
                for site in &report.sites {
                    print_site_report(site, report.max_load_percent);
                }
            } else {
                print_deployment_report(&report);
                println!();
                println!(
                    "Last exported: {}",
                    format_timestamp(deployment.exported_at.as_ref()).dimmed()
                );
            }
        }
    }

    Ok(())
}

/// Print a multi-site summary followed by the consolidated sizing
pub fn print_deployment_report(report: &DeploymentReport) {
    println!("{}", format!("Deployment: {}", report.name).bold());
    println!("{}", "=".repeat(60));
    println!("Max load:               {}%", report.max_load_percent);
    println!("Sites:                  {}", report.sites.len());
    println!();

    if report.sites.is_empty() {
        print_warning("Deployment has no sites");
        return;
    }

    let rows: Vec<SiteRow> = report
        .sites
        .iter()
        .map(|s| SiteRow {
            name: s.name.clone(),
            load: format_number(s.total_load),
            polling: format_allocation(&s.polling),
            polling_util: color_utilization(&s.polling, report.max_load_percent),
            eps: format_number(s.total_eps),
            logs: format_allocation(&s.logs),
            logs_util: color_utilization(&s.logs, report.max_load_percent),
            warnings: s.warnings.len().to_string(),
        })
        .collect();
    print_table(rows);
    println!();

    let rollup = &report.rollup;
    println!("{}", "Consolidated".bold());
    println!("{}", "-".repeat(60));
    println!("Total load:             {}", format_number(rollup.total_load));
    println!("Total EPS:              {}", format_number(rollup.total_eps));
    println!(
        "Polling collectors:     {} ({})",
        format_allocation(&rollup.polling).cyan(),
        color_utilization(&rollup.polling, report.max_load_percent)
    );
    println!(
        "Log collectors:         {} ({})",
        format_allocation(&rollup.logs).cyan(),
        color_utilization(&rollup.logs, report.max_load_percent)
    );
    println!(
        "Per-site total:         {} collectors",
        rollup.total_site_collectors
    );

    for site in report.sites.iter().filter(|s| !s.warnings.is_empty()) {
        println!();
        print_warnings(site);
    }
}

/// Print the detailed sizing of one site
pub fn print_site_report(report: &SiteReport, max_load_percent: f64) {
    println!("{}", format!("Site: {}", report.name).bold());
    println!("{}", "=".repeat(60));
    println!("Total load:             {}", format_number(report.total_load));
    println!("Total EPS:              {}", format_number(report.total_eps));
    println!();

    println!("{}", "Collectors".bold());
    println!("{}", "-".repeat(60));
    println!(
        "Polling:                {} ({})",
        format_allocation(&report.polling).cyan(),
        color_utilization(&report.polling, max_load_percent)
    );
    println!(
        "Logs:                   {} ({})",
        format_allocation(&report.logs).cyan(),
        color_utilization(&report.logs, max_load_percent)
    );

    let rows: Vec<DeviceRow> = report
        .breakdown
        .iter()
        .filter(|d| d.count > 0)
        .map(|d| DeviceRow {
            device: d.device.clone(),
            count: d.count,
            load: format_number(d.load),
            share: if report.total_load > 0.0 {
                format!("{:.1}%", d.load / report.total_load * 100.0)
            } else {
                "-".to_string()
            },
        })
        .collect();

    println!();
    if rows.is_empty() {
        print_info("No devices counted at this site");
    } else {
        println!("{}", "Load by Device Type".bold());
        println!("{}", "-".repeat(60));
        print_table(rows);
    }

    if !report.warnings.is_empty() {
        println!();
        print_warnings(report);
    }
}

fn print_warnings(report: &SiteReport) {
    println!("{}", format!("Warnings ({})", report.name).bold());
    for warning in &report.warnings {
        print_warning(&warning.to_string());
    }
}
