//! Logging setup from configuration.
//!
//! Structured logging via tracing-subscriber. Output goes to stderr so
//! stdout stays free for command output and, in serve mode, MCP protocol
//! messages. The configured level is the default directive; a `RUST_LOG`
//! value in the environment still overrides it.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::domain::models::LoggingConfig;

/// Install the global subscriber for the configured level and format.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(&config.level)?;

    match config.format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    let level = parse_log_level(level)?;
    Ok(EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy())
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels_parse_case_insensitively() {
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("warn").unwrap(), Level::WARN);
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn configured_level_becomes_the_default_directive() {
        temp_env::with_var_unset("RUST_LOG", || {
            let filter = env_filter("debug").unwrap();
            assert_eq!(filter.to_string(), "debug");
        });
    }

    #[test]
    fn rust_log_overrides_the_configured_level() {
        temp_env::with_var("RUST_LOG", Some("warn"), || {
            let filter = env_filter("debug").unwrap();
            assert_eq!(filter.to_string(), "warn");
        });
    }
}
