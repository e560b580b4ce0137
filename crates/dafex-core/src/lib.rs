//! Domain types and shared helpers for the dafex workspace.
//!
//! Holds the fund/decêndio vocabulary, period and currency formatting, the
//! history entry record, and the environment-based application configuration.

pub mod app_config;
pub mod config;
pub mod fund;
pub mod history;
pub mod money;
pub mod period;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use fund::{Decendio, Fund};
pub use history::HistoryEntry;
pub use money::format_brl;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("tipo de fundo inválido: {0}")]
    InvalidFund(String),

    #[error("decêndio inválido: {0}")]
    InvalidDecendio(String),

    #[error("data inválida: {0}")]
    InvalidDate(String),

    #[error("mês inválido: {0}")]
    InvalidMonth(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
