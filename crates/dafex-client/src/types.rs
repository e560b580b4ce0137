//! Wire types for the extract service.
//!
//! Field names match the service contract verbatim (`municipio`, `uf`,
//! `codigo`, `erro`, …); payloads are built once per submit and serialized
//! as-is.

use dafex_core::{Decendio, Fund};
use serde::{Deserialize, Serialize};

/// A municipality candidate returned by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipio {
    pub codigo: i64,
    pub municipio: String,
    pub uf: String,
}

impl Municipio {
    /// Human label used for suggestion rows: `"{municipio} ({uf})"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.municipio, self.uf)
    }
}

/// Request body for `extratos/gerar`: calendar date range in dotted form.
#[derive(Debug, Clone, Serialize)]
pub struct ExtratoLotePayload {
    pub tipo: Fund,
    pub decendio: Decendio,
    /// `DD.MM.YYYY`
    pub data_inicio: String,
    /// `DD.MM.YYYY`
    pub data_fim: String,
}

/// Request body shared by `extratos-12m/gerar`, `inex/gerar` and
/// `inex/baixar`: a month range plus the selected municipality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtratoMensalPayload {
    pub tipo: Fund,
    /// `YYYY-MM`, passed through unchanged.
    pub mes_inicio: String,
    /// `YYYY-MM`, passed through unchanged.
    pub mes_fim: String,
    pub codigo: i64,
    pub municipio: String,
    pub uf: String,
}

/// JSON preview returned by `inex/gerar`.
///
/// The header fields tolerate absence; the renderer substitutes a dash.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviaInex {
    #[serde(default)]
    pub municipio: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub periodo: Option<String>,
    #[serde(default)]
    pub resultados: Vec<ResultadoMes>,
}

/// One preview row: a month label and its amount.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultadoMes {
    pub mes: String,
    pub valor: f64,
}

/// Error envelope the service returns on failures: `{"erro": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErroEnvelope {
    #[serde(default)]
    pub erro: Option<String>,
}

/// Classified reply from a generation endpoint. Exactly one variant per
/// response, decided by status then declared content type.
#[derive(Debug)]
pub enum Resposta {
    /// 2xx with the endpoint's expected binary media type. `nome` is the
    /// filename extracted from `Content-Disposition`, when present and
    /// well-formed.
    Arquivo { bytes: Vec<u8>, nome: Option<String> },
    /// 2xx with a JSON body (only `inex/gerar` expects this).
    Previa(PreviaInex),
    /// Server-reported failure or a response that violates the contract.
    Falha(String),
}
