//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use crate::config::schema::{AppConfig, API_KEYS_FILE_ENV, MONITORING_WEBHOOK_ENV};
use crate::config::validation::{validate_config, ValidationError};
use crate::secrets::sources::utf8_vars;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the startup configuration: optional TOML file, then environment
/// overrides from the running process, then validation.
pub fn load_startup_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    config.apply_env_overrides(utf8_vars(std::env::vars_os()));
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

impl AppConfig {
    /// Log where the configuration came from. Call once the subscriber is
    /// installed.
    pub fn log_summary(&self, file: Option<&Path>) {
        tracing::info!(
            file = ?file,
            webhook_configured = self.monitoring.webhook_url.is_some(),
            buffer_capacity = self.monitoring.buffer_capacity,
            secrets_override = ?self.secrets.override_file,
            "Configuration loaded"
        );
    }

    /// Apply `ARCHEBLOW_*` overrides. Empty values count as unset.
    pub fn apply_env_overrides<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                API_KEYS_FILE_ENV => {
                    self.secrets.override_file = Some(PathBuf::from(value));
                }
                MONITORING_WEBHOOK_ENV => {
                    self.monitoring.webhook_url = Some(value.to_string());
                }
                _ => {}
            }
        }
    }
}
