//! Command-line surface.

use clap::Parser;
use std::path::PathBuf;

/// DriftGuard: feature drift reports and model health for tabular ML data
#[derive(Parser, Debug)]
#[command(name = "driftguard", version, about, long_about = None)]
pub struct Cli {
    /// Baseline (training) CSV; overrides `data.baseline_path`
    #[arg(long, global = true)]
    pub baseline: Option<PathBuf>,

    /// Current (production) CSV; overrides `data.current_path`
    #[arg(long, global = true)]
    pub current: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Workspace directory
    #[arg(short, long, default_value = ".", global = true)]
    pub workspace: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Per-feature PSI / KS / KL and severity
    Report,
    /// Health score, recommendation, top drifting features and alerts
    Dashboard,
    /// Summary statistics and histogram for one feature
    Feature {
        /// Feature (column) name
        name: String,
    },
    /// Serve the JSON API
    Serve {
        /// Bind address (default: server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port (default: server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Create a default `.driftguard/config.toml` in the workspace
    Init,
    /// Show the effective configuration
    Show,
}
