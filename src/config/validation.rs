//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the webhook URL shape
//! - Validate value ranges (capacity > 0, timeout > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use crate::config::schema::AppConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("webhook URL '{url}' is invalid: {reason}")]
    InvalidWebhookUrl { url: String, reason: String },

    #[error("monitoring.buffer_capacity must be greater than zero")]
    ZeroBufferCapacity,

    #[error("monitoring.webhook_timeout_secs must be greater than zero")]
    ZeroWebhookTimeout,

    #[error("secrets.file_names must name at least one file")]
    NoSecretFileNames,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(raw) = &config.monitoring.webhook_url {
        if let Err(reason) = check_webhook_url(raw) {
            errors.push(ValidationError::InvalidWebhookUrl {
                url: raw.clone(),
                reason,
            });
        }
    }

    if config.monitoring.buffer_capacity == 0 {
        errors.push(ValidationError::ZeroBufferCapacity);
    }

    if config.monitoring.webhook_timeout_secs == 0 {
        errors.push(ValidationError::ZeroWebhookTimeout);
    }

    if config.secrets.file_names.iter().all(|name| name.trim().is_empty()) {
        errors.push(ValidationError::NoSecretFileNames);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_webhook_url(raw: &str) -> Result<(), String> {
    let parsed = url::Url::parse(raw).map_err(|e| e.to_string())?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.monitoring.webhook_url = Some("ftp://hooks.example.com".into());
        config.monitoring.buffer_capacity = 0;
        config.monitoring.webhook_timeout_secs = 0;
        config.secrets.file_names.clear();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::InvalidWebhookUrl { .. }));
        assert!(errors.contains(&ValidationError::ZeroBufferCapacity));
        assert!(errors.contains(&ValidationError::NoSecretFileNames));
    }

    #[test]
    fn test_unparseable_webhook_url() {
        let mut config = AppConfig::default();
        config.monitoring.webhook_url = Some("not a url".into());

        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("not a url"));
    }
}
