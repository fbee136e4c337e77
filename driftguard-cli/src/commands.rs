//! CLI subcommand handlers.

use crate::cli::{Cli, Commands, ConfigAction};
use crate::render;
use crate::server;
use crate::state::AppState;
use driftguard_core::config::{self, DriftConfig};
use driftguard_core::data::Dataset;
use serde::Serialize;
use std::path::Path;

/// Handle a CLI subcommand.
pub async fn handle_command(cli: Cli, workspace: &Path) -> anyhow::Result<()> {
    match cli.command.clone() {
        Commands::Report => {
            let state = AppState::from_config(resolve_config(&cli, workspace)?, workspace)?;
            let (baseline, current) = load(&state).await?;
            let report = state.engine.build_report(&baseline, &current);
            emit(cli.json, &report, || render::report_table(&report))
        }
        Commands::Dashboard => {
            let state = AppState::from_config(resolve_config(&cli, workspace)?, workspace)?;
            let (baseline, current) = load(&state).await?;
            let report = state.engine.build_report(&baseline, &current);
            let summary = state.engine.summarize(&report);
            emit(cli.json, &summary, || render::dashboard_text(&summary))
        }
        Commands::Feature { name } => {
            let state = AppState::from_config(resolve_config(&cli, workspace)?, workspace)?;
            let (baseline, current) = load(&state).await?;
            let detail = state.engine.feature_detail(&baseline, &current, &name)?;
            emit(cli.json, &detail, || render::feature_text(&detail))
        }
        Commands::Serve { host, port } => {
            let config = resolve_config(&cli, workspace)?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let state = AppState::from_config(config, workspace)?;
            tracing::info!(
                baseline = %state.baseline.describe(),
                current = %state.current.describe(),
                "Serving drift API"
            );
            server::run(state.shared(), &host, port).await?;
            Ok(())
        }
        Commands::Config { action } => handle_config(&action, &cli, workspace),
    }
}

/// Load configuration and apply the dataset path flags.
pub fn resolve_config(cli: &Cli, workspace: &Path) -> anyhow::Result<DriftConfig> {
    let mut config = config::load_config(Some(workspace), cli.config.as_deref(), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    if let Some(path) = &cli.baseline {
        config.data.baseline_path = path.clone();
    }
    if let Some(path) = &cli.current {
        config.data.current_path = path.clone();
    }
    Ok(config)
}

async fn load(state: &AppState) -> anyhow::Result<(Dataset, Dataset)> {
    Ok(state.load_datasets().await?)
}

fn emit<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

fn handle_config(action: &ConfigAction, cli: &Cli, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_dir = workspace.join(".driftguard");
            std::fs::create_dir_all(&config_dir)?;

            let config_path = config_dir.join("config.toml");
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            let toml_str = config::to_toml(&DriftConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = resolve_config(cli, workspace)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("{}", config::to_toml(&config)?);
            }
            Ok(())
        }
    }
}
