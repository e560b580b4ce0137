//! The three generation workflows.
//!
//! All share the same lifecycle: validate (no network on failure) → build
//! the payload once → POST → classify → consume (save or render) → record
//! history. Controls re-enable on every exit path through the busy guard.

mod extrato;
mod extrato_12m;
mod inex;

pub use extrato::{ExtratoFields, ExtratoWorkflow};
pub use extrato_12m::Extrato12mWorkflow;
pub use inex::{InexWorkflow, Preview, PreviewRow};

use std::path::PathBuf;

use dafex_client::{ClientError, ExtratoMensalPayload};
use dafex_core::period::validate_month;
use dafex_core::Fund;

use crate::error::EngineError;
use crate::selection::Selection;
use crate::sink::FileSink;

/// Generic user-visible message for transport-level failures; they surface
/// through the same channel as server-reported errors.
const NETWORK_FAILURE: &str = "Falha de comunicação com o serviço.";

/// Message for replies whose shape the contract does not allow.
const UNEXPECTED_REPLY: &str = "Resposta inesperada do serviço.";

/// A produced file offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// Resolved filename: the `Content-Disposition` name or the workflow
    /// default.
    pub nome: String,
    pub caminho: PathBuf,
}

/// Form fields shared by the month-range workflows (12-month and INEX).
///
/// `municipio` is the search input's display text; after a pick it reads
/// `"{municipio} / {uf}"`; the payload carries the part before the slash.
#[derive(Debug, Clone)]
pub struct MonthRangeFields {
    pub tipo: Fund,
    /// `YYYY-MM`
    pub mes_inicio: String,
    /// `YYYY-MM`
    pub mes_fim: String,
    pub municipio: String,
}

fn service_error(err: ClientError) -> EngineError {
    tracing::warn!(error = %err, "generation request failed");
    EngineError::Service(NETWORK_FAILURE.to_owned())
}

fn save_file(sink: &dyn FileSink, nome: &str, bytes: &[u8]) -> Result<SavedFile, EngineError> {
    let caminho = sink
        .save(nome, bytes)
        .map_err(|source| EngineError::Save {
            nome: nome.to_owned(),
            source,
        })?;
    Ok(SavedFile {
        nome: nome.to_owned(),
        caminho,
    })
}

/// Validates the month-range fields against the confirmed selection and
/// builds the payload. Fails without any network I/O.
fn build_month_payload(
    selection: &Selection,
    fields: &MonthRangeFields,
) -> Result<ExtratoMensalPayload, EngineError> {
    let codigo = selection
        .codigo()
        .ok_or_else(|| EngineError::Validation("Selecione um município da lista.".to_owned()))?;
    let uf = selection.uf().unwrap_or_default();

    if fields.mes_inicio.trim().is_empty() || fields.mes_fim.trim().is_empty() {
        return Err(EngineError::Validation(
            "Selecione o mês inicial e o mês final.".to_owned(),
        ));
    }
    validate_month(&fields.mes_inicio).map_err(|e| EngineError::Validation(e.to_string()))?;
    validate_month(&fields.mes_fim).map_err(|e| EngineError::Validation(e.to_string()))?;

    let municipio = fields
        .municipio
        .split(" / ")
        .next()
        .unwrap_or(&fields.municipio)
        .trim()
        .to_owned();

    Ok(ExtratoMensalPayload {
        tipo: fields.tipo,
        mes_inicio: fields.mes_inicio.trim().to_owned(),
        mes_fim: fields.mes_fim.trim().to_owned(),
        codigo,
        municipio,
        uf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> MonthRangeFields {
        MonthRangeFields {
            tipo: Fund::Fpm,
            mes_inicio: "2024-09".to_owned(),
            mes_fim: "2025-08".to_owned(),
            municipio: "MANACAPURU / AM".to_owned(),
        }
    }

    #[test]
    fn unconfirmed_selection_blocks_payload_build() {
        let selection = Selection::new();
        let result = build_month_payload(&selection, &fields());
        assert!(
            matches!(result, Err(EngineError::Validation(ref msg)) if msg == "Selecione um município da lista."),
            "got: {result:?}"
        );
    }

    #[test]
    fn payload_splits_display_text_and_carries_selection() {
        let selection = Selection::new();
        selection.set(4636, "AM");
        let payload = build_month_payload(&selection, &fields()).unwrap();
        assert_eq!(payload.municipio, "MANACAPURU");
        assert_eq!(payload.codigo, 4636);
        assert_eq!(payload.uf, "AM");
        assert_eq!(payload.mes_inicio, "2024-09");
    }

    #[test]
    fn empty_months_are_rejected() {
        let selection = Selection::new();
        selection.set(4636, "AM");
        let mut f = fields();
        f.mes_fim = "  ".to_owned();
        let result = build_month_payload(&selection, &f);
        assert!(
            matches!(result, Err(EngineError::Validation(ref msg)) if msg == "Selecione o mês inicial e o mês final."),
            "got: {result:?}"
        );
    }

    #[test]
    fn malformed_month_is_rejected() {
        let selection = Selection::new();
        selection.set(4636, "AM");
        let mut f = fields();
        f.mes_inicio = "setembro".to_owned();
        assert!(matches!(
            build_month_payload(&selection, &f),
            Err(EngineError::Validation(_))
        ));
    }
}
