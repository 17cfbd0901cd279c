//! Application configuration loading, validation, and management.
//!
//! This module provides the top-level `Config` structure that aggregates
//! logging and Unbound instance settings. It handles locating the TOML file
//! (environment override or the fixed integration path), parsing, and
//! validation.
//!
//! The configuration is loaded once at startup and is immutable thereafter.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::config::{instance::InstanceConfig, logger::LoggerConfig};

pub mod instance;
pub mod logger;

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "NRI_UNBOUND_CONFIG";

/// Location used by the infrastructure agent's custom integrations.
pub const DEFAULT_CONFIG_PATH: &str =
    "/var/db/newrelic-infra/custom-integrations/nri-unbound-config.toml";

/// Simple macros for printing timestamped messages before the tracing subscriber
/// is initialized. These write to standard error, standard output carries the payload.
#[macro_export]
macro_rules! print_info {
    ($($arg:tt)*) => {
        eprintln!("{}  {} {}",
            console::style($crate::config::timestamp()).dim(),
            console::style("INFO").green(),
            format_args!($($arg)*)
        );
    };
}

#[macro_export]
macro_rules! print_warn {
    ($($arg:tt)*) => {
        eprintln!("{}  {} {}",
            console::style($crate::config::timestamp()).dim(),
            console::style("WARN").yellow(),
            format_args!($($arg)*)
        );
    };
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        eprintln!("{}  {} {}",
            console::style($crate::config::timestamp()).dim(),
            console::style("ERROR").red(),
            format_args!($($arg)*)
        );
    };
}

/// Current UTC time formatted for the early-startup print macros.
#[doc(hidden)]
pub fn timestamp() -> String {
    let format = time::macros::format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
    );
    time::OffsetDateTime::now_utc()
        .format(format)
        .unwrap_or_default()
}

/// Errors that can occur during configuration loading, parsing, or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// IO error while accessing the configuration file.
    #[error("IO error while reading configuration {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failure to parse the TOML configuration file.
    #[error("Parse error while reading configuration {path}: {reason}")]
    ParseError { path: String, reason: String },

    /// Validation failure after successful parsing.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// True when the file could not be located, opened, or read.
    pub fn is_read_error(&self) -> bool {
        matches!(self, ConfigError::NotFound(_) | ConfigError::IoError { .. })
    }
}

/// Top-level application configuration.
#[derive(Serialize, Deserialize, Debug, Validate, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// Logging subsystem configuration.
    #[validate(nested)]
    pub logger: LoggerConfig,

    /// Settings of the monitored Unbound instance.
    #[validate(nested)]
    pub instances: InstanceConfig,
}

impl Config {
    /// Constructs a new configuration by locating and loading the config file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration file cannot be
    /// read, parsed, or validated.
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path();
        Self::load(&config_path)
    }

    /// Determines the configuration file path.
    ///
    /// Priority:
    /// 1. `NRI_UNBOUND_CONFIG` environment variable
    /// 2. [`DEFAULT_CONFIG_PATH`]
    fn get_config_path() -> PathBuf {
        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(config_path);
            print_info!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
            return path;
        }

        PathBuf::from(DEFAULT_CONFIG_PATH)
    }

    /// Loads and validates configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Propagates IO, parsing, and validation errors as `ConfigError`.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let display = path.display().to_string();

        let config_str = fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ConfigError::NotFound(display.clone())
            } else {
                ConfigError::IoError {
                    path: display.clone(),
                    source,
                }
            }
        })?;

        let config = Self::from_toml(&config_str).map_err(|e| match e {
            ConfigError::ParseError { reason, .. } => ConfigError::ParseError {
                path: display.clone(),
                reason,
            },
            other => other,
        })?;

        print_info!("Loaded configuration from: {}", display);
        Ok(config)
    }

    /// Parses and validates configuration from a TOML document.
    pub fn from_toml(contents: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;

        config
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Ok(config)
    }
}
