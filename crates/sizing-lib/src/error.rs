//! Error types for the sizing library

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or configuring a sizing run.
///
/// Scoring and allocation never fail; only configuration and file handling do.
#[derive(Debug, Error)]
pub enum SizingError {
    #[error("invalid capacity table: {0}")]
    InvalidCapacityTable(String),

    #[error("max load percent must be between 1 and 100, got {0}")]
    InvalidMaxLoad(f64),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse deployment file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported deployment file version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

pub type Result<T> = std::result::Result<T, SizingError>;
