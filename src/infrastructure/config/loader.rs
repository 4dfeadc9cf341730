//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("api base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("invalid timeout: {0}. Must be at least 1 second")]
    InvalidTimeout(u64),

    #[error("invalid roster TTL: {0}. Must be at least 1 second")]
    InvalidRosterTtl(u64),

    #[error("invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("token_env cannot be empty")]
    EmptyTokenEnv,
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .rolodex/config.yaml (project config)
    /// 3. Environment variables (`ROLODEX_*` prefix, `__` as separator)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".rolodex/config.yaml"))
            .merge(Env::prefixed("ROLODEX_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.api.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if config.api.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.api.timeout_secs));
        }
        if config.api.token_env.trim().is_empty() {
            return Err(ConfigError::EmptyTokenEnv);
        }
        if config.cache.roster_ttl_secs == 0 {
            return Err(ConfigError::InvalidRosterTtl(config.cache.roster_ttl_secs));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let config = Config::default();
        assert!(ConfigLoader::validate(&config).is_ok());
        assert_eq!(config.cache.roster_ttl_secs, 300);
        assert_eq!(config.api.token_env, "ROLODEX_API_TOKEN");
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut config = Config::default();
        config.cache.roster_ttl_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRosterTtl(0))
        ));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn yaml_parses_into_the_config_model() {
        let yaml = r"
api:
  base_url: https://directory.example.com/v1
  timeout_secs: 10
logging:
  level: debug
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api.base_url, "https://directory.example.com/v1");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.logging.level, "debug");
        // Omitted sections fall back to their defaults.
        assert_eq!(config.cache.roster_ttl_secs, 300);
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api:\n  base_url: https://directory.example.com/v1\ncache:\n  roster_ttl_secs: 60"
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://directory.example.com/v1");
        assert_eq!(config.cache.roster_ttl_secs, 60);
        // Untouched sections keep their defaults.
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn env_overrides_defaults() {
        temp_env::with_var("ROLODEX_CACHE__ROSTER_TTL_SECS", Some("42"), || {
            let config = ConfigLoader::load().unwrap();
            assert_eq!(config.cache.roster_ttl_secs, 42);
        });
    }
}
