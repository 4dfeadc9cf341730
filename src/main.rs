//! Rolodex CLI entry point.
//!
//! Configuration is loaded before the subscriber is installed so the
//! configured level and format apply; errors up to that point go to plain
//! stderr. Logging always writes to stderr, leaving stdout for command
//! output and, in serve mode, MCP protocol messages.

use clap::Parser;

use rolodex::cli::Cli;
use rolodex::infrastructure::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match rolodex::cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err:#}");
            std::process::exit(1);
        }
    };

    if let Err(err) = logging::init(&config.logging) {
        eprintln!("logging setup failed: {err:#}");
        std::process::exit(1);
    }

    if let Err(err) = rolodex::cli::run(cli, &config).await {
        tracing::error!(error = %err, "command failed");
        std::process::exit(1);
    }
}
