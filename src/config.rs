//! Application configuration.
//!
//! Values resolve in order: command-line flag, environment variable, config
//! file, built-in default.

use crate::consts::cli_consts::DEFAULT_PAGE_SIZE_OPTIONS;
use crate::consts::cli_consts::refresh::{DEFAULT_INTERVAL_SECS, MAX_INTERVAL_SECS};
use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};
use thiserror::Error;

/// Environment variable selecting the API deployment (`local` or a base URL).
pub const ENVIRONMENT_VAR: &str = "ARBI_ENVIRONMENT";
/// Environment variable overriding the API base URL.
pub const API_URL_VAR: &str = "ARBI_API_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("refresh interval must be at least one second")]
    ZeroRefreshInterval,

    #[error("refresh interval of {0} seconds exceeds the maximum of {max} seconds", max = MAX_INTERVAL_SECS)]
    RefreshIntervalTooLarge(u64),

    #[error("at least one page size option is required")]
    NoPageSizeOptions,

    #[error("page size options must be greater than zero")]
    ZeroPageSize,

    #[error("page size {0} is not one of the configured options {1:?}")]
    UnsupportedPageSize(usize, Vec<usize>),

    #[error("invalid API URL '{0}': expected an http:// or https:// URL")]
    InvalidApiUrl(String),

    #[error("invalid ARBI_ENVIRONMENT '{0}': expected 'local' or an http(s) URL")]
    InvalidEnvironment(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the arbitrage API. `None` means the local backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    pub refresh_interval_seconds: u64,
    pub page_size_options: Vec<usize>,
    /// Whether the user holds an active subscription.
    pub subscription_active: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            refresh_interval_seconds: DEFAULT_INTERVAL_SECS,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            subscription_active: true,
        }
    }
}

/// Values supplied on the command line. Unset fields leave the config untouched.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub refresh_interval_seconds: Option<u64>,
    pub inactive: bool,
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the file if it exists, falling back to defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Applies `ARBI_ENVIRONMENT` then `ARBI_API_URL`, read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENVIRONMENT_VAR).filter(|v| !v.trim().is_empty()) {
            let environment = value
                .parse::<Environment>()
                .map_err(|_| ConfigError::InvalidEnvironment(value.clone()))?;
            self.api_url = match environment {
                Environment::Local => None,
                Environment::Custom { api_url } => Some(api_url),
            };
        }
        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.api_url = Some(url);
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.api_url {
            self.api_url = Some(url.clone());
        }
        if let Some(secs) = overrides.refresh_interval_seconds {
            self.refresh_interval_seconds = secs;
        }
        if overrides.inactive {
            self.subscription_active = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_seconds == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if self.refresh_interval_seconds > MAX_INTERVAL_SECS {
            return Err(ConfigError::RefreshIntervalTooLarge(
                self.refresh_interval_seconds,
            ));
        }
        if self.page_size_options.is_empty() {
            return Err(ConfigError::NoPageSizeOptions);
        }
        if self.page_size_options.contains(&0) {
            return Err(ConfigError::ZeroPageSize);
        }
        self.environment().map(|_| ())
    }

    /// Checks a requested initial page size against the configured options.
    pub fn check_page_size(&self, page_size: usize) -> Result<usize, ConfigError> {
        if self.page_size_options.contains(&page_size) {
            Ok(page_size)
        } else {
            Err(ConfigError::UnsupportedPageSize(
                page_size,
                self.page_size_options.clone(),
            ))
        }
    }

    pub fn environment(&self) -> Result<Environment, ConfigError> {
        match &self.api_url {
            None => Ok(Environment::Local),
            Some(url) => url
                .parse::<Environment>()
                .map_err(|_| ConfigError::InvalidApiUrl(url.clone())),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}

/// Resolves file, environment and command-line layers into a validated config.
pub fn resolve_config(path: &Path, overrides: &Overrides) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default(path)
        .map_err(|e| format!("Failed to load config from {}: {}", path.display(), e))?;
    config.apply_env(|name| std::env::var(name).ok())?;
    config.apply_overrides(overrides);
    config.validate()?;
    Ok(config)
}

/// Location of the config file under the user's home directory.
pub fn get_config_path() -> Result<PathBuf, io::Error> {
    let home_path = home::home_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Failed to determine home directory")
    })?;
    Ok(home_path.join(".arbi-dash").join("config.json"))
}
