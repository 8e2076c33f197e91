use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use scombz_core::config::ScombzConfig;
use scombz_store::Store;

mod cli;
mod commands;

use cli::{Cli, Command};

const DEFAULT_LOG_FILTER: &str = "scombz=info,scombz_cli=info,scombz_core=info,scombz_store=info,\
scombz_timetable=info,scombz_tasks=info,scombz_login=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(DEFAULT_LOG_FILTER)
            }),
        )
        .init();

    let cli = Cli::parse();

    // explicit --config > SCOMBZ_CONFIG env > ~/.scombz/scombz.toml
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .or_else(|| std::env::var("SCOMBZ_CONFIG").ok());
    let config = ScombzConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("config load failed ({e}), using defaults");
        ScombzConfig::default()
    });

    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| config.store.path.clone().into());
    let store = Store::open(&store_path)?;
    info!(path = %store_path.display(), "store ready");

    match cli.command {
        Command::Timetable(cmd) => commands::timetable(&store, cmd),
        Command::Tasks(cmd) => commands::tasks(&store, &config, cmd).await,
        Command::Login(cmd) => commands::login(&store, &config, cmd).await,
        Command::Store(cmd) => commands::store(&store, cmd),
        Command::Settings(cmd) => commands::settings(cmd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_covers_every_crate() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        for target in [
            "scombz_cli",
            "scombz_core",
            "scombz_store",
            "scombz_timetable",
            "scombz_tasks",
            "scombz_login",
        ] {
            assert!(
                DEFAULT_LOG_FILTER.split(',').any(|d| d == format!("{target}=info")),
                "{target} missing from default filter"
            );
        }
    }
}
