use std::time::Duration;

use anyhow::bail;
use dafex_client::Municipio;
use dafex_core::AppConfig;
use dafex_engine::{MunicipioSearch, Selection};
use tokio::io::{AsyncBufReadExt, BufReader};

pub(crate) async fn run(
    config: &AppConfig,
    texto: Option<&str>,
    interativo: bool,
) -> anyhow::Result<()> {
    let services = crate::context::connect(config)?;

    if interativo {
        let search = MunicipioSearch::new(
            services.client,
            Selection::new(),
            Duration::from_millis(config.debounce_ms),
        );
        match pick_interactively(&search).await? {
            Some(picked) => println!("{} [{}]", picked.label(), picked.codigo),
            None => println!("nenhum município selecionado"),
        }
        return Ok(());
    }

    let Some(texto) = texto else {
        bail!("informe o texto de busca ou use --interativo");
    };
    let municipios = services.client.search_municipios(texto.trim()).await?;
    print_rows(&municipios);
    Ok(())
}

fn print_rows(municipios: &[Municipio]) {
    if municipios.is_empty() {
        println!("nenhum município encontrado");
        return;
    }
    println!("{:<8}MUNICÍPIO", "CÓDIGO");
    for m in municipios {
        println!("{:<8}{}", m.codigo, m.label());
    }
}

/// Incremental picker over stdin: every typed line goes through the
/// debounced search; a row number picks that suggestion; an empty line
/// dismisses the list and leaves without a pick.
async fn pick_interactively(search: &MunicipioSearch) -> anyhow::Result<Option<Municipio>> {
    println!("digite para buscar (mínimo 2 letras); número escolhe; linha vazia sai");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_owned();
        if line.is_empty() {
            search.dismiss();
            return Ok(None);
        }
        if let Ok(index) = line.parse::<usize>() {
            if let Some(picked) = index.checked_sub(1).and_then(|i| search.select(i)) {
                return Ok(Some(picked));
            }
            println!("linha inválida; refine a busca");
            continue;
        }
        search.on_input(&line);
        search.settle().await;
        let suggestions = search.suggestions();
        if suggestions.is_empty() {
            println!("(sem sugestões)");
            continue;
        }
        for (i, m) in suggestions.iter().enumerate() {
            println!("{:>2}. {}", i + 1, m.label());
        }
    }
    Ok(None)
}

/// Resolves `texto` to exactly one municipality through the suggestion
/// search. With several candidates, an exact name match wins; otherwise the
/// candidates are listed and the command fails so the user can refine.
pub(crate) async fn resolve_unique(
    search: &MunicipioSearch,
    texto: &str,
) -> anyhow::Result<Municipio> {
    search.on_input(texto);
    search.settle().await;
    let suggestions = search.suggestions();

    let index = match suggestions.len() {
        0 => bail!("nenhum município encontrado para \"{texto}\""),
        1 => 0,
        n => {
            let exact: Vec<usize> = suggestions
                .iter()
                .enumerate()
                .filter(|(_, m)| m.municipio.eq_ignore_ascii_case(texto.trim()))
                .map(|(i, _)| i)
                .collect();
            if let [only] = exact[..] {
                only
            } else {
                for m in &suggestions {
                    eprintln!("  {}", m.label());
                }
                bail!("{n} municípios correspondem a \"{texto}\"; refine o texto");
            }
        }
    };

    search
        .select(index)
        .ok_or_else(|| anyhow::anyhow!("sugestão indisponível"))
}
