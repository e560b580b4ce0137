//! HTTP client for the extract service.
//!
//! Wraps `reqwest` with the service's response conventions: municipality
//! lookup returns a JSON array; the generation endpoints answer either a
//! binary payload (zip/xlsx with a `Content-Disposition` filename), a JSON
//! preview (`inex/gerar` only), or a JSON error envelope `{"erro": ...}`.
//! Replies are classified by status and declared content type into
//! [`Resposta`], never by inspecting the body first.

mod client;
mod disposition;
mod error;
mod types;

pub use client::ServiceClient;
pub use disposition::filename_from_disposition;
pub use error::ClientError;
pub use types::{
    ExtratoLotePayload, ExtratoMensalPayload, Municipio, PreviaInex, Resposta, ResultadoMes,
};
