//! Ad-hoc sizing from the built-in device catalog

use anyhow::{bail, Context, Result};
use sizing_lib::catalog::default_device_defaults;
use sizing_lib::{Site, SizingEngine, SizingOptions};

use super::calculate::print_site_report;
use crate::output::{print_json, OutputFormat};

/// Parse a `TYPE=COUNT` device argument
pub fn parse_device(arg: &str) -> std::result::Result<(String, u32), String> {
    let (name, count) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected TYPE=COUNT, got '{}'", arg))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing device type in '{}'", arg));
    }

    let count = count
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid count in '{}': {}", arg, e))?;

    Ok((name.to_string(), count))
}

/// Build a site from catalog defaults with the given device counts
pub fn build_site(devices: &[(String, u32)], eps: f64) -> Result<Site> {
    let defaults = default_device_defaults();
    let mut site = Site::from_defaults("Quick Estimate", &defaults);

    for (name, count) in devices {
        match site.devices.get_mut(name) {
            Some(entry) => {
                entry.count = entry
                    .count
                    .checked_add(*count)
                    .with_context(|| format!("Too many devices of type '{}'", name))?;
            }
            None => {
                let known: Vec<&str> = defaults.keys().map(String::as_str).collect();
                bail!(
                    "Unknown device type '{}'. Known types: {}",
                    name,
                    known.join(", ")
                );
            }
        }
    }

    site.log_sources.insert("syslog".to_string(), eps);
    Ok(site)
}

/// Size an ad-hoc inventory
pub fn quick(
    devices: &[(String, u32)],
    eps: f64,
    options: SizingOptions,
    format: OutputFormat,
) -> Result<()> {
    let site = build_site(devices, eps)?;
    let engine = SizingEngine::with_defaults(options)?;
    let report = engine.size_site(&site);

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_site_report(&report, options.max_load_percent),
    }

    Ok(())
}
