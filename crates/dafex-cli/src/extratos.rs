use dafex_core::{AppConfig, Decendio, Fund};
use dafex_engine::{ExtratoFields, ExtratoWorkflow};

pub(crate) async fn run(
    config: &AppConfig,
    tipo: &str,
    decendio: &str,
    inicio: &str,
    fim: &str,
) -> anyhow::Result<()> {
    let services = crate::context::connect(config)?;
    let workflow = ExtratoWorkflow::new(services.client, services.store, services.sink);

    let fields = ExtratoFields {
        tipo: tipo.parse::<Fund>()?,
        decendio: decendio.parse::<Decendio>()?,
        data_inicio: inicio.to_owned(),
        data_fim: fim.to_owned(),
    };

    let saved = workflow.submit(&fields).await?;
    println!("arquivo salvo em {}", saved.caminho.display());
    Ok(())
}
