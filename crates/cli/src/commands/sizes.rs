//! Collector size listing

use anyhow::{Context, Result};
use sizing_lib::catalog::default_capacity_table;
use sizing_lib::{CapacityTable, Deployment};
use std::path::Path;
use tabled::Tabled;

use crate::output::{format_number, print_json, print_table, OutputFormat};

#[derive(Tabled)]
struct SizeRow {
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Load Capacity")]
    weight: String,
    #[tabled(rename = "EPS Capacity")]
    eps: String,
    #[tabled(rename = "Load @ Max")]
    weight_at_max: String,
    #[tabled(rename = "EPS @ Max")]
    eps_at_max: String,
}

/// Show the capacity table, from a deployment file or the built-in one.
///
/// The max load comes from `max_load`, then the deployment file, then
/// `configured_max_load`.
pub fn show_sizes(
    deployment_file: Option<&Path>,
    max_load: Option<f64>,
    configured_max_load: f64,
    format: OutputFormat,
) -> Result<()> {
    let (table, deployment_max_load): (CapacityTable, Option<f64>) = match deployment_file {
        Some(path) => {
            let deployment = Deployment::load(path)
                .with_context(|| format!("Failed to load deployment file {}", path.display()))?;
            (deployment.capacities, Some(deployment.max_load_percent))
        }
        None => (default_capacity_table(), None),
    };
    let max_load_percent = max_load
        .or(deployment_max_load)
        .unwrap_or(configured_max_load);

    match format {
        OutputFormat::Json => print_json(&table)?,
        OutputFormat::Table => {
            let factor = max_load_percent / 100.0;
            let rows: Vec<SizeRow> = table
                .iter()
                .map(|u| SizeRow {
                    size: u.size.clone(),
                    weight: format_number(u.weight),
                    eps: format_number(u.eps),
                    weight_at_max: format_number(u.weight * factor),
                    eps_at_max: format_number(u.eps * factor),
                })
                .collect();
            print_table(rows);
            println!("\nMax load: {}%", max_load_percent);
        }
    }

    Ok(())
}
