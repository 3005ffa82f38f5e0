//! Deployment template command

use anyhow::{bail, Context, Result};
use sizing_lib::Deployment;
use std::path::Path;

use crate::output::{print_info, print_success};

/// Write a deployment template pre-filled with catalog defaults
pub fn init(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let mut deployment = Deployment::template();
    deployment
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_success(&format!("Wrote deployment template to {}", output.display()));
    print_info("Set device counts and log rates per site, then run `sizer calculate`");
    Ok(())
}
