//! 12-month extract workflow (`extratos-12m/gerar`).

use std::sync::Arc;

use dafex_client::{Resposta, ServiceClient};
use dafex_core::period::{now_display, period_label};
use dafex_core::HistoryEntry;

use crate::busy::BusyFlag;
use crate::error::EngineError;
use crate::history::{HistoryLog, HistoryStore, KEY_EXTRATOS_12M};
use crate::selection::Selection;
use crate::sink::FileSink;

use super::{build_month_payload, save_file, service_error, MonthRangeFields, SavedFile,
            UNEXPECTED_REPLY};

const DEFAULT_FILENAME: &str = "extrato.zip";

/// Generates the 12-month extract archive for one selected municipality.
///
/// Owns the [`Selection`] its suggestion search writes into; a submit with
/// no confirmed pick is rejected before any network call.
pub struct Extrato12mWorkflow {
    client: Arc<ServiceClient>,
    selection: Selection,
    history: HistoryLog,
    sink: Arc<dyn FileSink>,
    busy: BusyFlag,
}

impl Extrato12mWorkflow {
    #[must_use]
    pub fn new(
        client: Arc<ServiceClient>,
        store: Arc<dyn HistoryStore>,
        sink: Arc<dyn FileSink>,
    ) -> Self {
        Self {
            client,
            selection: Selection::new(),
            history: HistoryLog::new(store, KEY_EXTRATOS_12M),
            sink,
            busy: BusyFlag::new(),
        }
    }

    /// Handle for wiring a `MunicipioSearch` to this workflow.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection.clone()
    }

    /// This workflow's activity log.
    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Full submit lifecycle; see the module docs for the shared shape.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Busy`] while another submit is outstanding.
    /// - [`EngineError::Validation`] on a missing selection or malformed
    ///   months; no network call is made.
    /// - [`EngineError::Service`] for server-reported, contract-violating
    ///   or network failures.
    /// - [`EngineError::Save`] when the archive cannot be written.
    pub async fn submit(&self, fields: &MonthRangeFields) -> Result<SavedFile, EngineError> {
        let _guard = self.busy.try_acquire().ok_or(EngineError::Busy)?;

        let payload = build_month_payload(&self.selection, fields)?;

        tracing::debug!(tipo = %fields.tipo, codigo = payload.codigo, "submitting 12-month extract");
        match self
            .client
            .gerar_extrato_12m(&payload)
            .await
            .map_err(service_error)?
        {
            Resposta::Arquivo { bytes, nome } => {
                let nome = nome.unwrap_or_else(|| DEFAULT_FILENAME.to_owned());
                let saved = save_file(self.sink.as_ref(), &nome, &bytes)?;
                self.history.record(HistoryEntry::month_range(
                    fields.tipo.as_str(),
                    &payload.municipio,
                    &payload.uf,
                    &period_label(&payload.mes_inicio, &payload.mes_fim),
                    &now_display(),
                ));
                Ok(saved)
            }
            Resposta::Falha(msg) => Err(EngineError::Service(msg)),
            Resposta::Previa(_) => Err(EngineError::Service(UNEXPECTED_REPLY.to_owned())),
        }
    }
}
