use crate::error::{AppError, Result};
use crate::search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search and ranking configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Recent-query history configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Saved-search persistence configuration
    #[serde(default)]
    pub state: StateConfig,

    /// Portfolio health thresholds
    #[serde(default)]
    pub health: HealthConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> std::result::Result<Self, config::ConfigError> {
        let config_path = std::env::var("PORTFOLIO_CONFIG")
            .unwrap_or_else(|_| "config/portfolio.toml".to_string());

        Self::load_from(&config_path)
    }

    /// Load configuration layering the embedded defaults, the given file
    /// (optional) and `PORTFOLIO__*` environment variables
    pub fn load_from(config_path: &str) -> std::result::Result<Self, config::ConfigError> {
        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(config_path).required(false))
            // Override with environment variables (prefix: PORTFOLIO__)
            .add_source(
                config::Environment::with_prefix("PORTFOLIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;

        if self.history.recent_cap == 0 {
            return Err(AppError::Configuration(
                "history.recent_cap must be at least 1".to_string(),
            ));
        }

        if self.state.backend == StateBackend::Sled && self.state.path.is_none() {
            return Err(AppError::Configuration(
                "Sled backend requires 'state.path' configuration".to_string(),
            ));
        }

        let thresholds = [
            self.health.needs_update_after_days,
            self.health.renotify_after_days,
        ];
        if thresholds
            .iter()
            .any(|&days| days <= 0 || chrono::Duration::try_days(days).is_none())
        {
            return Err(AppError::Configuration(
                "health thresholds must be positive, representable day counts".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of recent queries kept
    #[serde(default = "default_recent_cap")]
    pub recent_cap: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            recent_cap: default_recent_cap(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateConfig {
    /// State backend type
    #[serde(default)]
    pub backend: StateBackend,

    /// Path for the embedded database (sled)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StateBackend {
    #[default]
    Memory,
    Sled,
}

/// Days without an update before a company needs one
pub const DEFAULT_NEEDS_UPDATE_DAYS: i64 = 30;

/// Days between reminders to the same company
pub const DEFAULT_RENOTIFY_DAYS: i64 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Days without a founder update before a company needs one
    #[serde(default = "default_needs_update_days")]
    pub needs_update_after_days: i64,

    /// Minimum days between two reminders to the same company
    #[serde(default = "default_renotify_days")]
    pub renotify_after_days: i64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            needs_update_after_days: default_needs_update_days(),
            renotify_after_days: default_renotify_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

// Default value functions
fn default_recent_cap() -> usize {
    10
}

fn default_needs_update_days() -> i64 {
    DEFAULT_NEEDS_UPDATE_DAYS
}

fn default_renotify_days() -> i64 {
    DEFAULT_RENOTIFY_DAYS
}

fn default_log_level() -> String {
    "info".to_string()
}
