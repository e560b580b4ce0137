use std::sync::Arc;
use std::time::Duration;

use dafex_core::{AppConfig, Fund};
use dafex_engine::{Extrato12mWorkflow, MonthRangeFields, MunicipioSearch};

pub(crate) async fn run(
    config: &AppConfig,
    tipo: &str,
    municipio: &str,
    inicio: &str,
    fim: &str,
) -> anyhow::Result<()> {
    let services = crate::context::connect(config)?;
    let workflow =
        Extrato12mWorkflow::new(Arc::clone(&services.client), services.store, services.sink);
    let search = MunicipioSearch::new(
        services.client,
        workflow.selection(),
        Duration::from_millis(config.debounce_ms),
    );

    let picked = crate::municipios::resolve_unique(&search, municipio).await?;
    tracing::info!(codigo = picked.codigo, municipio = %picked.municipio, "município selecionado");

    let fields = MonthRangeFields {
        tipo: tipo.parse::<Fund>()?,
        mes_inicio: inicio.to_owned(),
        mes_fim: fim.to_owned(),
        municipio: search.input(),
    };

    let saved = workflow.submit(&fields).await?;
    println!("arquivo salvo em {}", saved.caminho.display());
    Ok(())
}
