//! Collector Sizing CLI
//!
//! A command-line tool for sizing polling and log collectors from a
//! device inventory, validating deployment files and listing sizes.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use commands::{calculate, init, quick, sizes, validate};
use sizing_lib::catalog::DEFAULT_MAX_LOAD_PERCENT;
use sizing_lib::{SizingMetrics, SizingOptions};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Collector Sizing CLI
#[derive(Parser)]
#[command(name = "sizer")]
#[command(author, version, about = "Collector capacity sizing calculator", long_about = None)]
pub struct Cli {
    /// Path to the CLI config file (defaults to ~/.config/sizer/config.json)
    #[arg(long, env = "SIZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Print Prometheus metrics to stderr after the command
    #[arg(long)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Size every site in a deployment file
    Calculate {
        /// Deployment file (falls back to deployment_file from config)
        file: Option<PathBuf>,

        /// Only size the named site
        #[arg(long)]
        site: Option<String>,

        /// Override the max-load percent
        #[arg(long)]
        max_load: Option<f64>,

        /// Add a standby polling collector
        #[arg(long)]
        polling_failover: bool,

        /// Add a standby log collector
        #[arg(long)]
        logs_failover: bool,
    },

    /// Size an ad-hoc inventory built from the device catalog
    Quick {
        /// Device count as TYPE=COUNT (repeatable)
        #[arg(long = "device", short, value_parser = quick::parse_device)]
        devices: Vec<(String, u32)>,

        /// Log events per second
        #[arg(long, default_value_t = 0.0)]
        eps: f64,

        /// Max-load percent
        #[arg(long)]
        max_load: Option<f64>,

        /// Add a standby polling collector
        #[arg(long)]
        polling_failover: bool,

        /// Add a standby log collector
        #[arg(long)]
        logs_failover: bool,
    },

    /// Check a deployment file for configuration errors and data-quality warnings
    Validate {
        /// Deployment file (falls back to deployment_file from config)
        file: Option<PathBuf>,
    },

    /// List collector sizes and capacities
    Sizes {
        /// Read the capacity table from this deployment file
        #[arg(long)]
        deployment: Option<PathBuf>,

        /// Max-load percent used for the derated columns [default: from the
        /// deployment file, then config]
        #[arg(long)]
        max_load: Option<f64>,
    },

    /// Write a deployment template
    Init {
        /// Output file path
        #[arg(long, short, default_value = "deployment.json")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn deployment_file(file: Option<PathBuf>, config: &config::Config) -> Result<PathBuf> {
    file.or_else(|| config.deployment_file.clone())
        .context("No deployment file given and none configured (deployment_file)")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config = config::Config::load(cli.config.as_deref())?;
    debug!(?config, "Loaded configuration");

    let format = match (cli.format, config.default_format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(name)) => output::OutputFormat::from_str(name, true)
            .map_err(|e| anyhow::anyhow!("Invalid default_format in config: {}", e))?,
        (None, None) => output::OutputFormat::default(),
    };
    let configured_max_load = config
        .max_load_percent
        .unwrap_or(DEFAULT_MAX_LOAD_PERCENT);

    match cli.command {
        Commands::Calculate {
            file,
            site,
            max_load,
            polling_failover,
            logs_failover,
        } => {
            let file = deployment_file(file, &config)?;
            let overrides = calculate::CalculateOverrides {
                site,
                max_load_percent: max_load,
                polling_failover,
                logs_failover,
            };
            calculate::calculate(&file, overrides, format)?;
        }
        Commands::Quick {
            devices,
            eps,
            max_load,
            polling_failover,
            logs_failover,
        } => {
            let options = SizingOptions {
                max_load_percent: max_load.unwrap_or(configured_max_load),
                enable_polling_failover: polling_failover,
                enable_logs_failover: logs_failover,
            };
            quick::quick(&devices, eps, options, format)?;
        }
        Commands::Validate { file } => {
            let file = deployment_file(file, &config)?;
            validate::validate_file(&file, format)?;
        }
        Commands::Sizes {
            deployment,
            max_load,
        } => {
            sizes::show_sizes(deployment.as_deref(), max_load, configured_max_load, format)?;
        }
        Commands::Init { output, force } => {
            init::init(&output, force)?;
        }
    }

    if cli.metrics {
        eprint!("{}", SizingMetrics::new().encode_text());
    }

    Ok(())
}
