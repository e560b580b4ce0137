use std::sync::Arc;

use anyhow::Context as _;
use dafex_client::ServiceClient;
use dafex_core::AppConfig;
use dafex_engine::{DiskSink, FileSink, FileStore, HistoryStore};

/// Wired-up collaborators shared by the commands: the service client plus
/// the disk-backed history and download ports.
pub(crate) struct Services {
    pub client: Arc<ServiceClient>,
    pub store: Arc<dyn HistoryStore>,
    pub sink: Arc<dyn FileSink>,
}

pub(crate) fn connect(config: &AppConfig) -> anyhow::Result<Services> {
    let client = Arc::new(
        ServiceClient::with_base_url(&config.service_url, config.request_timeout_secs)
            .context("construir o cliente do serviço de extratos")?,
    );
    Ok(Services {
        client,
        store: Arc::new(FileStore::new(&config.history_dir)),
        sink: Arc::new(DiskSink::new(&config.download_dir)),
    })
}
