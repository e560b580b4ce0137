use std::path::PathBuf;

/// Runtime configuration, loaded from `DAFEX_*` environment variables.
///
/// Every field has a default; see `config::build_app_config` for the
/// variable names and default values.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the extract service.
    pub service_url: String,
    /// Request timeout applied to every HTTP call.
    pub request_timeout_secs: u64,
    /// Quiet period before a suggestion lookup is issued.
    pub debounce_ms: u64,
    /// Directory holding the persisted per-workflow history files.
    pub history_dir: PathBuf,
    /// Directory generated files are saved into.
    pub download_dir: PathBuf,
    pub log_level: String,
}
