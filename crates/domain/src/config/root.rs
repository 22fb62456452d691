use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::ConfigError;
use super::filtering::FilteringConfig;
use super::logging::LoggingConfig;
use crate::validators;

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub filtering: FilteringConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values supplied on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<String>,
    pub update_interval_hours: Option<u32>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from `path` (or defaults when absent) and apply overrides.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if Path::new(p).exists() => Self::from_file(p)?,
            _ => Config::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            source: e,
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(dir) = overrides.data_dir {
            self.filtering.data_dir = dir;
        }
        if let Some(hours) = overrides.update_interval_hours {
            self.filtering.update_interval_hours = hours;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let filtering = &self.filtering;

        if filtering.fetch_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "filtering.fetch_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if filtering.fetch_concurrency == 0 {
            return Err(ConfigError::Validation(
                "filtering.fetch_concurrency must be greater than 0".to_string(),
            ));
        }
        validators::validate_update_interval(filtering.update_interval_hours).map_err(|e| {
            ConfigError::Validation(format!("filtering.update_interval_hours: {}", e))
        })?;
        if filtering.data_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "filtering.data_dir cannot be empty".to_string(),
            ));
        }

        for entry in filtering.filters.iter().chain(&filtering.whitelist_filters) {
            validators::validate_url(&entry.url)
                .map_err(|e| ConfigError::Validation(format!("{}: {}", entry.url, e)))?;
        }

        Ok(())
    }
}
