//! INEX workflow (`inex/gerar` + `inex/baixar`): preview, then an explicit
//! download that replays the previewed payload.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dafex_client::{ExtratoMensalPayload, PreviaInex, Resposta, ServiceClient};
use dafex_core::period::{now_display, period_label};
use dafex_core::{format_brl, HistoryEntry};

use crate::busy::BusyFlag;
use crate::error::EngineError;
use crate::history::{HistoryLog, HistoryStore, KEY_INEX};
use crate::selection::Selection;
use crate::sink::FileSink;

use super::{build_month_payload, save_file, service_error, MonthRangeFields, SavedFile,
            UNEXPECTED_REPLY};

const DEFAULT_FILENAME: &str = "INEX.xlsx";

/// Placeholder for preview header fields the service left out.
const EMPTY_FIELD: &str = "\u{2014}";

/// One preview table row, amount pre-formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRow {
    pub mes: String,
    pub valor: f64,
    /// `valor` as Brazilian currency (`R$ 1.234,56`).
    pub valor_formatado: String,
}

/// Rendered preview data for the result panel.
#[derive(Debug, Clone)]
pub struct Preview {
    pub municipio: String,
    pub tipo: String,
    pub periodo: String,
    pub rows: Vec<PreviewRow>,
}

impl Preview {
    fn from_wire(previa: PreviaInex) -> Self {
        Self {
            municipio: previa.municipio.unwrap_or_else(|| EMPTY_FIELD.to_owned()),
            tipo: previa.tipo.unwrap_or_else(|| EMPTY_FIELD.to_owned()),
            periodo: previa.periodo.unwrap_or_else(|| EMPTY_FIELD.to_owned()),
            rows: previa
                .resultados
                .into_iter()
                .map(|r| PreviewRow {
                    valor_formatado: format_brl(r.valor),
                    mes: r.mes,
                    valor: r.valor,
                })
                .collect(),
        }
    }
}

/// Payload captured at preview success, pinned to the selection epoch it was
/// generated under.
#[derive(Debug)]
struct HeldPreview {
    payload: ExtratoMensalPayload,
    epoch: u64,
}

/// Preview-then-download workflow.
///
/// `preview` renders the JSON result and arms `download`; typing in the
/// search box afterwards disarms it. The history entry is recorded at
/// preview success; the explicit download step records nothing further.
pub struct InexWorkflow {
    client: Arc<ServiceClient>,
    selection: Selection,
    history: HistoryLog,
    sink: Arc<dyn FileSink>,
    busy: BusyFlag,
    held: Mutex<Option<HeldPreview>>,
}

impl InexWorkflow {
    #[must_use]
    pub fn new(
        client: Arc<ServiceClient>,
        store: Arc<dyn HistoryStore>,
        sink: Arc<dyn FileSink>,
    ) -> Self {
        Self {
            client,
            selection: Selection::new(),
            history: HistoryLog::new(store, KEY_INEX),
            sink,
            busy: BusyFlag::new(),
            held: Mutex::new(None),
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

    /// Whether the explicit download affordance is currently armed.
    #[must_use]
    pub fn can_download(&self) -> bool {
        self.held_lock()
            .as_ref()
            .is_some_and(|held| held.epoch == self.selection.epoch())
    }

    /// Requests the JSON preview. On success the payload is captured for
    /// [`InexWorkflow::download`] and the history entry is recorded.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Busy`] while another request is outstanding.
    /// - [`EngineError::Validation`] on a missing selection or malformed
    ///   months; no network call is made.
    /// - [`EngineError::Service`] for server-reported, contract-violating
    ///   or network failures.
    pub async fn preview(&self, fields: &MonthRangeFields) -> Result<Preview, EngineError> {
        let _guard = self.busy.try_acquire().ok_or(EngineError::Busy)?;

        // A new attempt always disarms the previous download.
        *self.held_lock() = None;

        let payload = build_month_payload(&self.selection, fields)?;

        tracing::debug!(tipo = %fields.tipo, codigo = payload.codigo, "requesting INEX preview");
        match self
            .client
            .gerar_previa_inex(&payload)
            .await
            .map_err(service_error)?
        {
            Resposta::Previa(previa) => {
                let epoch = self.selection.epoch();
                self.history.record(HistoryEntry::month_range(
                    fields.tipo.as_str(),
                    &payload.municipio,
                    &payload.uf,
                    &period_label(&payload.mes_inicio, &payload.mes_fim),
                    &now_display(),
                ));
                *self.held_lock() = Some(HeldPreview { payload, epoch });
                Ok(Preview::from_wire(previa))
            }
            Resposta::Falha(msg) => Err(EngineError::Service(msg)),
            Resposta::Arquivo { .. } => Err(EngineError::Service(UNEXPECTED_REPLY.to_owned())),
        }
    }

    /// Replays the payload captured at preview time against the download
    /// endpoint and saves the spreadsheet. The form fields are not
    /// re-validated; the request body is byte-identical to the preview's.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Busy`] while another request is outstanding.
    /// - [`EngineError::Validation`] when no armed preview exists (none was
    ///   generated, or typing invalidated it).
    /// - [`EngineError::Service`] for server-reported, contract-violating
    ///   or network failures.
    /// - [`EngineError::Save`] when the spreadsheet cannot be written.
    pub async fn download(&self) -> Result<SavedFile, EngineError> {
        let _guard = self.busy.try_acquire().ok_or(EngineError::Busy)?;

        let payload = self
            .held_lock()
            .as_ref()
            .filter(|held| held.epoch == self.selection.epoch())
            .map(|held| held.payload.clone())
            .ok_or_else(|| {
                EngineError::Validation("Gere uma prévia antes de baixar.".to_owned())
            })?;

        tracing::debug!(codigo = payload.codigo, "downloading INEX spreadsheet");
        match self.client.baixar_inex(&payload).await.map_err(service_error)? {
            Resposta::Arquivo { bytes, nome } => {
                let nome = nome.unwrap_or_else(|| DEFAULT_FILENAME.to_owned());
                save_file(self.sink.as_ref(), &nome, &bytes)
            }
            Resposta::Falha(msg) => Err(EngineError::Service(msg)),
            Resposta::Previa(_) => Err(EngineError::Service(UNEXPECTED_REPLY.to_owned())),
        }
    }

    fn held_lock(&self) -> MutexGuard<'_, Option<HeldPreview>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
