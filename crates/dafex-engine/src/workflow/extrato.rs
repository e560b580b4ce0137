//! Date-range extract workflow (`extratos/gerar`).

use std::sync::Arc;

use dafex_client::{ExtratoLotePayload, Resposta, ServiceClient};
use dafex_core::period::{iso_to_dotted_date, now_display, period_label};
use dafex_core::{Decendio, Fund, HistoryEntry};

use crate::busy::BusyFlag;
use crate::error::EngineError;
use crate::history::{HistoryLog, HistoryStore, KEY_EXTRATOS};
use crate::sink::FileSink;

use super::{save_file, service_error, SavedFile, UNEXPECTED_REPLY};

/// Fallback filename when the response carries no usable disposition.
const DEFAULT_FILENAME: &str = "extratos.zip";

/// Form fields for the date-range batch workflow.
#[derive(Debug, Clone)]
pub struct ExtratoFields {
    pub tipo: Fund,
    pub decendio: Decendio,
    /// ISO calendar date (`YYYY-MM-DD`).
    pub data_inicio: String,
    /// ISO calendar date (`YYYY-MM-DD`).
    pub data_fim: String,
}

/// Generates the per-municipality extract batch for a date range and saves
/// the produced archive.
pub struct ExtratoWorkflow {
    client: Arc<ServiceClient>,
    history: HistoryLog,
    sink: Arc<dyn FileSink>,
    busy: BusyFlag,
}

impl ExtratoWorkflow {
    #[must_use]
    pub fn new(
        client: Arc<ServiceClient>,
        store: Arc<dyn HistoryStore>,
        sink: Arc<dyn FileSink>,
    ) -> Self {
        Self {
            client,
            history: HistoryLog::new(store, KEY_EXTRATOS),
            sink,
            busy: BusyFlag::new(),
        }
    }

    /// This workflow's activity log.
    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Full submit lifecycle. On success the archive is saved under the
    /// server-supplied name (or the default) and a history entry is recorded
    /// from the human-entered values.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Busy`] while another submit is outstanding.
    /// - [`EngineError::Validation`] on missing or malformed dates; no
    ///   network call is made.
    /// - [`EngineError::Service`] for server-reported, contract-violating
    ///   or network failures.
    /// - [`EngineError::Save`] when the archive cannot be written.
    pub async fn submit(&self, fields: &ExtratoFields) -> Result<SavedFile, EngineError> {
        let _guard = self.busy.try_acquire().ok_or(EngineError::Busy)?;

        if fields.data_inicio.trim().is_empty() || fields.data_fim.trim().is_empty() {
            return Err(EngineError::Validation("Preencha as datas.".to_owned()));
        }
        let data_inicio = iso_to_dotted_date(&fields.data_inicio)
            .map_err(|e| EngineError::Validation(e.to_string()))?;
        let data_fim = iso_to_dotted_date(&fields.data_fim)
            .map_err(|e| EngineError::Validation(e.to_string()))?;

        let payload = ExtratoLotePayload {
            tipo: fields.tipo,
            decendio: fields.decendio,
            data_inicio: data_inicio.clone(),
            data_fim: data_fim.clone(),
        };

        tracing::debug!(tipo = %fields.tipo, decendio = %fields.decendio, "submitting extract batch");
        match self.client.gerar_extratos(&payload).await.map_err(service_error)? {
            Resposta::Arquivo { bytes, nome } => {
                let nome = nome.unwrap_or_else(|| DEFAULT_FILENAME.to_owned());
                let saved = save_file(self.sink.as_ref(), &nome, &bytes)?;
                self.history.record(HistoryEntry::date_range(
                    fields.tipo.as_str(),
                    &period_label(&data_inicio, &data_fim),
                    fields.decendio.as_str(),
                    &now_display(),
                ));
                Ok(saved)
            }
            Resposta::Falha(msg) => Err(EngineError::Service(msg)),
            Resposta::Previa(_) => Err(EngineError::Service(UNEXPECTED_REPLY.to_owned())),
        }
    }
}
