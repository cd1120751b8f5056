//! Check command implementation.

use crate::models::config;
use crate::preflight;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// Run preflight checks against both backends.
pub async fn check(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config(config_path)?;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks(&config).await;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above and try again.");
    }

    Ok(())
}
