use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation logic is decoupled from the actual environment so
/// it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let service_url = or_default("DAFEX_SERVICE_URL", "http://localhost:8000");
    let request_timeout_secs = parse_u64("DAFEX_REQUEST_TIMEOUT_SECS", "30")?;
    let debounce_ms = parse_u64("DAFEX_DEBOUNCE_MS", "250")?;
    let history_dir = PathBuf::from(or_default("DAFEX_HISTORY_DIR", "./.dafex/historico"));
    let download_dir = PathBuf::from(or_default("DAFEX_DOWNLOAD_DIR", "."));
    let log_level = or_default("DAFEX_LOG_LEVEL", "info");

    Ok(AppConfig {
        service_url,
        request_timeout_secs,
        debounce_ms,
        history_dir,
        download_dir,
        log_level,
    })
}
