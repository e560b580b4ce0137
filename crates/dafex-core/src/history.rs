//! History entry record.
//!
//! One entry per successful generation. The three workflows persist slightly
//! different shapes under independent keys; the optional fields cover both.

use serde::{Deserialize, Serialize};

/// A record of a past successful generation.
///
/// Never updated after creation; the only collection-level mutation is
/// head-insertion with tail truncation (see the engine's history log).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub tipo: String,
    pub periodo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decendio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uf: Option<String>,
    pub quando: String,
}

impl HistoryEntry {
    /// Entry for the date-range workflow (carries the decêndio).
    #[must_use]
    pub fn date_range(tipo: &str, periodo: &str, decendio: &str, quando: &str) -> Self {
        Self {
            tipo: tipo.to_owned(),
            periodo: periodo.to_owned(),
            decendio: Some(decendio.to_owned()),
            municipio: None,
            uf: None,
            quando: quando.to_owned(),
        }
    }

    /// Entry for the month-range workflows (carries the municipality).
    #[must_use]
    pub fn month_range(tipo: &str, municipio: &str, uf: &str, periodo: &str, quando: &str) -> Self {
        Self {
            tipo: tipo.to_owned(),
            periodo: periodo.to_owned(),
            decendio: None,
            municipio: Some(municipio.to_owned()),
            uf: Some(uf.to_owned()),
            quando: quando.to_owned(),
        }
    }

    /// Display line for the history list, matching the workflow shape:
    ///
    /// - `TIPO | {municipio} ({uf}) | {periodo} | {quando}`
    /// - `TIPO | {periodo} | {decendio} | {quando}`
    #[must_use]
    pub fn display_line(&self) -> String {
        let tipo = self.tipo.to_uppercase();
        if let (Some(municipio), Some(uf)) = (&self.municipio, &self.uf) {
            return format!(
                "{tipo} | {municipio} ({uf}) | {} | {}",
                self.periodo, self.quando
            );
        }
        match &self.decendio {
            Some(decendio) => format!("{tipo} | {} | {decendio} | {}", self.periodo, self.quando),
            None => format!("{tipo} | {} | {}", self.periodo, self.quando),
        }
    }
}
