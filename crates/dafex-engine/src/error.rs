use std::io;

use thiserror::Error;

/// Errors surfaced by the generation workflows.
///
/// Each variant's message is the single user-visible string for the failed
/// attempt; every error is terminal for that attempt and leaves the workflow
/// idle and usable again.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Required fields missing or no confirmed municipality selection.
    /// Raised before any network I/O.
    #[error("{0}")]
    Validation(String),

    /// Server-reported failure, contract-violating response, or network
    /// failure; all surfaced identically.
    #[error("{0}")]
    Service(String),

    /// The produced file could not be written to disk.
    #[error("falha ao gravar {nome}: {source}")]
    Save {
        nome: String,
        #[source]
        source: io::Error,
    },

    /// A submission is already outstanding for this workflow.
    #[error("já existe uma geração em andamento")]
    Busy,
}
