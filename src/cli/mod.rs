//! Command-line interface.

pub mod commands;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::adapters::http::HttpDirectory;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::DirectoryService;

/// Read-through caching MCP server for an HR directory API.
#[derive(Parser)]
#[command(name = "rolodex", version, about)]
pub struct Cli {
    /// Path to an alternate configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP stdio server (JSON-RPC 2.0 on stdin/stdout).
    Serve,
    /// Print the org chart for the current roster.
    Chart,
    /// Find employees by name or email substring.
    Find {
        /// Case-insensitive substring of the employee's name or email.
        query: String,
    },
    /// List who is out of office (defaults to today).
    WhosOut {
        /// Range start, YYYY-MM-DD.
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Range end, YYYY-MM-DD.
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

/// Load configuration, preferring an explicit file when given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Wire the HTTP adapter and service layer from configuration.
pub fn build_service(config: &Config) -> anyhow::Result<Arc<DirectoryService<HttpDirectory>>> {
    let api = Arc::new(HttpDirectory::from_env(&config.api)?);
    Ok(Arc::new(DirectoryService::new(api, &config.cache)))
}

/// Dispatch a parsed command line against an already-loaded configuration.
pub async fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    let service = build_service(config)?;

    match cli.command {
        Commands::Serve => commands::serve::execute(service).await,
        Commands::Chart => commands::chart::execute(&service).await,
        Commands::Find { query } => commands::find::execute(&service, &query).await,
        Commands::WhosOut { from, to } => commands::whos_out::execute(&service, from, to).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn whos_out_parses_dates() {
        let cli = Cli::parse_from(["rolodex", "whos-out", "--from", "2026-08-24"]);
        match cli.command {
            Commands::WhosOut { from, to } => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2026, 8, 24));
                assert_eq!(to, None);
            }
            _ => panic!("expected whos-out"),
        }
    }
}
