//! Configuration management for the CLI

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// Layered from `~/.config/sizer/config.json` (or `--config`), then
/// `SIZER_*` environment variables. Command-line flags win over both.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Default output format (`table` or `json`)
    pub default_format: Option<String>,
    /// Max-load threshold for ad-hoc estimates
    pub max_load_percent: Option<f64>,
    /// Deployment file used when none is given on the command line
    pub deployment_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        let path = match override_path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::config_path().ok(),
        };
        if let Some(path) = path {
            // An explicit --config must exist
            builder = builder.add_source(
                config::File::from(path.as_path()).required(override_path.is_some()),
            );
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("SIZER").try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("sizer").join("config.json"))
    }
}
