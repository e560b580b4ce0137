use std::sync::Arc;
use std::time::Duration;

use dafex_core::{AppConfig, Fund};
use dafex_engine::{InexWorkflow, MonthRangeFields, MunicipioSearch};

pub(crate) async fn run(
    config: &AppConfig,
    tipo: &str,
    municipio: &str,
    inicio: &str,
    fim: &str,
    baixar: bool,
) -> anyhow::Result<()> {
    let services = crate::context::connect(config)?;
    let workflow = InexWorkflow::new(Arc::clone(&services.client), services.store, services.sink);
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

    let preview = workflow.preview(&fields).await?;
    println!("Município: {}", preview.municipio);
    println!("Tipo:      {}", preview.tipo);
    println!("Período:   {}", preview.periodo);
    println!();
    if preview.rows.is_empty() {
        println!("Sem dados.");
    } else {
        println!("{:<24}VALOR", "MÊS");
        for row in &preview.rows {
            println!("{:<24}{}", row.mes, row.valor_formatado);
        }
    }

    if baixar {
        let saved = workflow.download().await?;
        println!();
        println!("planilha salva em {}", saved.caminho.display());
    }

    Ok(())
}
