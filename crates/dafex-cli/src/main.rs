mod context;
mod extratos;
mod extratos_12m;
mod historico;
mod inex;
mod municipios;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dafex")]
#[command(about = "Cliente de extratos de repasses municipais (FPM / royalties)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Busca municípios; com --interativo abre o seletor incremental
    Municipios {
        /// Texto de busca (mínimo 2 caracteres)
        texto: Option<String>,
        #[arg(long)]
        interativo: bool,
    },
    /// Gera o lote de extratos por período de datas (zip)
    Extratos {
        /// fpm | royalties
        #[arg(long)]
        tipo: String,
        /// 1 | 2 | 3
        #[arg(long)]
        decendio: String,
        /// Data inicial (YYYY-MM-DD)
        #[arg(long)]
        inicio: String,
        /// Data final (YYYY-MM-DD)
        #[arg(long)]
        fim: String,
    },
    /// Gera o extrato de 12 meses de um município (zip)
    #[command(name = "extratos-12m")]
    Extratos12m {
        /// fpm | royalties
        #[arg(long)]
        tipo: String,
        /// Texto de busca do município (precisa resolver para um único)
        #[arg(long)]
        municipio: String,
        /// Mês inicial (YYYY-MM)
        #[arg(long)]
        inicio: String,
        /// Mês final (YYYY-MM)
        #[arg(long)]
        fim: String,
    },
    /// Gera a prévia INEX e, com --baixar, a planilha
    Inex {
        /// fpm | royalties
        #[arg(long)]
        tipo: String,
        /// Texto de busca do município (precisa resolver para um único)
        #[arg(long)]
        municipio: String,
        /// Mês inicial (YYYY-MM)
        #[arg(long)]
        inicio: String,
        /// Mês final (YYYY-MM)
        #[arg(long)]
        fim: String,
        /// Baixa a planilha após a prévia
        #[arg(long)]
        baixar: bool,
    },
    /// Mostra o histórico de gerações
    Historico {
        /// extratos | extratos-12m | inex
        #[arg(long)]
        fluxo: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = dafex_core::load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Municipios { texto, interativo } => {
            municipios::run(&config, texto.as_deref(), interativo).await
        }
        Commands::Extratos {
            tipo,
            decendio,
            inicio,
            fim,
        } => extratos::run(&config, &tipo, &decendio, &inicio, &fim).await,
        Commands::Extratos12m {
            tipo,
            municipio,
            inicio,
            fim,
        } => extratos_12m::run(&config, &tipo, &municipio, &inicio, &fim).await,
        Commands::Inex {
            tipo,
            municipio,
            inicio,
            fim,
            baixar,
        } => inex::run(&config, &tipo, &municipio, &inicio, &fim, baixar).await,
        Commands::Historico { fluxo } => historico::run(&config, fluxo.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extratos_12m_subcommand_uses_hyphenated_name() {
        let cli = Cli::try_parse_from([
            "dafex",
            "extratos-12m",
            "--tipo",
            "fpm",
            "--municipio",
            "manacapuru",
            "--inicio",
            "2024-09",
            "--fim",
            "2025-08",
        ])
        .expect("should parse");
        assert!(matches!(cli.command, Commands::Extratos12m { .. }));
    }
}
