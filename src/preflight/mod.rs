//! Preflight checks and startup resolution of backend defaults.

mod backend;

use crate::models::config::Config;
use crate::services::arr::ArrHttp;
use crate::services::radarr::RadarrClient;
use crate::services::sonarr::SonarrClient;
use crate::Result;
use colored::Colorize;
use std::sync::Arc;

/// Result of a preflight check.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub success: bool,
    pub message: String,
    pub hint: Option<String>,
}

impl CheckResult {
    pub fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            message: message.to_string(),
            hint: None,
        }
    }

    pub fn fail(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }
}

/// Both backend clients, ready for requests.
pub struct Backends {
    pub radarr: Arc<RadarrClient>,
    pub sonarr: Arc<SonarrClient>,
}

/// Run all preflight checks.
pub async fn run_preflight_checks(config: &Config) -> Vec<CheckResult> {
    vec![
        backend::check("Radarr", &config.radarr).await,
        backend::check("Sonarr", &config.sonarr).await,
    ]
}

/// Build both clients, resolving quality profile and root folder from the
/// backends when the config leaves them out. Any failure here is
/// `Error::ConfigurationMissing` and the process should not start.
pub async fn connect(config: &Config) -> Result<Backends> {
    let radarr_http = ArrHttp::new(&config.radarr)?;
    let radarr_defaults = radarr_http.resolve_defaults(&config.radarr).await?;
    tracing::info!(
        "Radarr defaults: quality profile {}, root folder {}",
        radarr_defaults.quality_profile_id,
        radarr_defaults.root_folder_path
    );

    let sonarr_http = ArrHttp::new(&config.sonarr)?;
    let sonarr_defaults = sonarr_http.resolve_defaults(&config.sonarr).await?;
    tracing::info!(
        "Sonarr defaults: quality profile {}, root folder {}",
        sonarr_defaults.quality_profile_id,
        sonarr_defaults.root_folder_path
    );

    Ok(Backends {
        radarr: Arc::new(RadarrClient::new(
            radarr_http,
            radarr_defaults,
            &config.radarr.minimum_availability,
        )),
        sonarr: Arc::new(SonarrClient::new(
            sonarr_http,
            sonarr_defaults,
            config.sonarr.language_profile_id,
        )),
    })
}

/// Print preflight check results.
pub fn print_results(results: &[CheckResult]) {
    for result in results {
        if result.success {
            println!(
                "{} {}: {}",
                "[OK]".green(),
                result.name.bold(),
                result.message
            );
        } else {
            println!(
                "{} {}: {}",
                "[FAIL]".red(),
                result.name.bold(),
                result.message
            );
            if let Some(ref hint) = result.hint {
                println!("  {} {}", "->".yellow(), hint);
            }
        }
    }
}

/// Check if all preflight checks passed.
pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(|r| r.success)
}
