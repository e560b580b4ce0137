//! Interaction engine shared by the three extract workflows.
//!
//! Two composed pieces drive every form: [`MunicipioSearch`], a debounced
//! remote-suggestion search that discards stale in-flight results, and the
//! generation workflows in [`workflow`], which validate fields, submit the
//! request, classify the reply and either save the produced file or render a
//! preview. Each successful generation lands in a capped, persisted
//! [`HistoryLog`].
//!
//! Persistence and file saving go through the [`HistoryStore`] and
//! [`FileSink`] ports so tests run against in-memory implementations.

pub mod busy;
pub mod error;
pub mod history;
pub mod search;
pub mod selection;
pub mod sink;
pub mod workflow;

pub use busy::{BusyFlag, BusyGuard};
pub use error::EngineError;
pub use history::{
    FileStore, HistoryLog, HistoryStore, MemoryStore, HISTORY_CAP, KEY_EXTRATOS, KEY_EXTRATOS_12M,
    KEY_INEX,
};
pub use search::MunicipioSearch;
pub use selection::Selection;
pub use sink::{DiskSink, FileSink, MemorySink};
pub use workflow::{
    Extrato12mWorkflow, ExtratoFields, ExtratoWorkflow, InexWorkflow, MonthRangeFields, Preview,
    PreviewRow, SavedFile,
};
