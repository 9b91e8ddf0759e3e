//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve secrets once from the validated configuration
//! - Build the notification pipeline
//! - Expose the consumer-facing API in one cloneable bundle
//!
//! # Design Decisions
//! - Only a malformed explicit override path is fatal
//! - Unreadable optional layers are surfaced as warnings and skipped

use std::sync::Arc;
use thiserror::Error;

use crate::config::{AppConfig, ConfigError};
use crate::monitoring::{Details, Level, NotificationEvent, NotificationPipeline, Report};
use crate::secrets::{ResolutionChain, SecretStore, SecretValue, SecretsError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("secret resolution failed: {0}")]
    Secrets(#[from] SecretsError),
}

/// Process-wide services, built once and passed to consumers.
#[derive(Clone)]
pub struct Services {
    secrets: Arc<SecretStore>,
    notifications: NotificationPipeline,
}

impl Services {
    /// Resolve secrets with the standard chain and build the pipeline.
    pub fn bootstrap(config: &AppConfig) -> Result<Self, StartupError> {
        Self::with_chain(config, ResolutionChain::standard(&config.secrets))
    }

    /// Same as [`Services::bootstrap`] with a caller-supplied chain.
    pub fn with_chain(config: &AppConfig, chain: ResolutionChain) -> Result<Self, StartupError> {
        let secrets = SecretStore::resolve(chain)?;

        let snapshot = secrets.snapshot();
        for failure in snapshot.layer_errors() {
            tracing::warn!(
                layer = %failure.layer,
                error = %failure.error,
                "Secrets layer skipped at startup"
            );
        }

        let notifications = NotificationPipeline::from_config(&config.monitoring);

        tracing::info!(
            secrets = snapshot.len(),
            webhook_enabled = notifications.dispatcher().is_enabled(),
            buffer_capacity = notifications.buffer().capacity(),
            "Services initialized"
        );

        Ok(Self {
            secrets: Arc::new(secrets),
            notifications,
        })
    }

    /// Look up a secret. `None` means no layer defines it.
    pub fn resolve_secret(&self, name: &str) -> Option<SecretValue> {
        self.secrets.get(name)
    }

    /// Report an operational error; delivery problems are never raised.
    pub async fn report_error(
        &self,
        level: Level,
        source: &str,
        message: &str,
        details: Details,
    ) -> Report {
        self.notifications.report(level, source, message, details).await
    }

    /// Most recent events for the dashboard, newest last.
    pub fn recent_events(&self, n: usize) -> Vec<Arc<NotificationEvent>> {
        self.notifications.recent_events(n)
    }

    /// Re-resolve every secret layer from scratch.
    pub fn reload_secrets(&self) -> Result<(), SecretsError> {
        self.secrets.reload()
    }

    pub fn secrets(&self) -> &SecretStore {
        &self.secrets
    }

    pub fn notifications(&self) -> &NotificationPipeline {
        &self.notifications
    }
}
