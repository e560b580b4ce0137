use std::sync::Arc;

use anyhow::bail;
use dafex_core::AppConfig;
use dafex_engine::{FileStore, HistoryLog, HistoryStore, KEY_EXTRATOS, KEY_EXTRATOS_12M, KEY_INEX};

const FLOWS: [(&str, &str); 3] = [
    ("extratos", KEY_EXTRATOS),
    ("extratos-12m", KEY_EXTRATOS_12M),
    ("inex", KEY_INEX),
];

pub(crate) fn run(config: &AppConfig, fluxo: Option<&str>) -> anyhow::Result<()> {
    let store: Arc<dyn HistoryStore> = Arc::new(FileStore::new(&config.history_dir));

    let selected: Vec<(&str, &str)> = match fluxo {
        Some(name) => {
            let Some(flow) = FLOWS.iter().find(|(n, _)| *n == name) else {
                bail!("fluxo desconhecido: {name} (use extratos, extratos-12m ou inex)");
            };
            vec![*flow]
        }
        None => FLOWS.to_vec(),
    };

    for (name, key) in selected {
        println!("== {name} ==");
        let log = HistoryLog::new(Arc::clone(&store), key);
        let lines = log.lines();
        if lines.is_empty() {
            println!("(vazio)");
        } else {
            for line in lines {
                println!("{line}");
            }
        }
        println!();
    }

    Ok(())
}
