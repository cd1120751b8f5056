//! Backend preflight check.

use super::CheckResult;
use crate::models::config::BackendConfig;
use crate::services::arr::ArrHttp;
use crate::Error;

/// Check that a backend answers and its add defaults can be resolved.
pub async fn check(name: &str, config: &BackendConfig) -> CheckResult {
    let http = match ArrHttp::new(config) {
        Ok(http) => http,
        Err(e) => return CheckResult::fail(name, &e.to_string(), "Check the backend url"),
    };

    match http.resolve_defaults(config).await {
        Ok(defaults) => CheckResult::ok(
            name,
            &format!(
                "connected (quality profile {}, root folder {})",
                defaults.quality_profile_id, defaults.root_folder_path
            ),
        ),
        Err(Error::ConfigurationMissing(reason)) if reason.contains("status 401") => {
            CheckResult::fail(name, "invalid API key", "Check the api_key setting")
        }
        Err(e) => CheckResult::fail(
            name,
            &e.to_string(),
            &format!("Check that {} is reachable", http.base_url()),
        ),
    }
}
