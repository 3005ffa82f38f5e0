//! Deployment validation command

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use sizing_lib::{validate, validate_log_sources, Deployment, SizingEngine, ValidationWarning};
use std::path::Path;

use crate::output::{print_json, print_success, print_warning, OutputFormat};

#[derive(Serialize)]
struct SiteWarnings<'a> {
    site: &'a str,
    warnings: Vec<ValidationWarning>,
}

/// Check a deployment file.
///
/// Configuration errors fail the command; data-quality warnings do not.
pub fn validate_file(file: &Path, format: OutputFormat) -> Result<()> {
    let deployment = Deployment::load(file)
        .with_context(|| format!("Failed to load deployment file {}", file.display()))?;
    SizingEngine::from_deployment(&deployment).context("Invalid deployment settings")?;

    let results: Vec<SiteWarnings> = deployment
        .sites
        .iter()
        .map(|site| {
            let mut warnings = validate(&site.devices, &deployment.method_weights);
            warnings.extend(validate_log_sources(&site.log_sources));
            SiteWarnings {
                site: &site.name,
                warnings,
            }
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&results)?,
        OutputFormat::Table => {
            let total: usize = results.iter().map(|r| r.warnings.len()).sum();
            if total == 0 {
                print_success(&format!(
                    "{}: {} site(s), no issues found",
                    file.display(),
                    deployment.sites.len()
                ));
                return Ok(());
            }

            for result in results.iter().filter(|r| !r.warnings.is_empty()) {
                println!("{}", result.site.bold());
                for warning in &result.warnings {
                    print_warning(&warning.to_string());
                }
                println!();
            }
            println!("Total: {} warning(s)", total);
        }
    }

    Ok(())
}
