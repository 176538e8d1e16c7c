use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Scan { directory, max_depth, graphviz, csv, read_std_conf } => {
            commands::handle_scan(directory, max_depth, graphviz, csv, read_std_conf).await
        }
        Commands::Pypi { dir, pkg, version } => commands::handle_pypi(dir, pkg, version).await,
    }
}
