//! Layered configuration loading and validation.

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Environment variable prefix; `__` separates nested keys.
pub const ENV_PREFIX: &str = "NRF_CACHE_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Sweep interval of zero.
    #[error("Invalid eviction_interval_secs: {0}. Must be at least 1")]
    InvalidEvictionInterval(u64),

    /// Unknown log level.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown log format.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// Log directory set to an empty string.
    #[error("Log directory cannot be empty when set")]
    EmptyLogDir,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .nrf-cache/config.yaml
    /// 3. .nrf-cache/local.yaml (optional local overrides)
    /// 4. Environment variables (NRF_CACHE_* prefix)
    pub fn load() -> Result<Config> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Yaml::file(".nrf-cache/config.yaml"))
                .merge(Yaml::file(".nrf-cache/local.yaml"))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Load configuration from a specific file, still honouring environment
    /// overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let path = path.as_ref();
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
        .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.cache.eviction_interval_secs == 0 {
            return Err(ConfigError::InvalidEvictionInterval(
                config.cache.eviction_interval_secs,
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.logging.log_dir.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::EmptyLogDir);
        }

        Ok(())
    }
}
