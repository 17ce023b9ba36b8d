//! Configuration models loaded by `ConfigLoader`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for the discovery cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Cache behaviour
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How multi-valued filter dimensions are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// At least one requested service name and one requested slice must be
    /// present. Slices are looked up in the SMF info block when it exists,
    /// otherwise in the allowed list.
    #[default]
    AnyOf,
    /// Every requested service name and every requested slice must be present.
    /// Each slice is looked up in the SMF info block, then the allowed list.
    AllOf,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Seconds between expiry sweeps of each category cache
    #[serde(default = "default_eviction_interval_secs")]
    pub eviction_interval_secs: u64,

    /// Filter evaluation policy
    #[serde(default)]
    pub match_policy: MatchPolicy,
}

const fn default_eviction_interval_secs() -> u64 {
    30
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            eviction_interval_secs: default_eviction_interval_secs(),
            match_policy: MatchPolicy::default(),
        }
    }
}

impl CacheConfig {
    /// Sweep interval as a `Duration`.
    pub const fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
