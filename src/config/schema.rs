//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit secrets file.
pub const API_KEYS_FILE_ENV: &str = "ARCHEBLOW_API_KEYS_FILE";

/// Environment variable carrying the monitoring webhook URL.
pub const MONITORING_WEBHOOK_ENV: &str = "ARCHEBLOW_MONITORING_WEBHOOK";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Where secrets are read from.
    pub secrets: SecretsConfig,

    /// Event buffering and webhook delivery.
    pub monitoring: MonitoringConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Secrets file discovery.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// Explicit secrets file. When set, no other location is searched.
    pub override_file: Option<PathBuf>,

    /// Directories searched in order. Empty means the executable's directory,
    /// then the working directory.
    pub search_dirs: Vec<PathBuf>,

    /// File names tried inside each search directory, in order.
    pub file_names: Vec<String>,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            override_file: None,
            search_dirs: Vec::new(),
            file_names: vec!["api_keys.env".to_string(), ".env".to_string()],
        }
    }
}

impl SecretsConfig {
    /// Directories to search, falling back to the executable's directory and
    /// the working directory.
    pub fn effective_search_dirs(&self) -> Vec<PathBuf> {
        if !self.search_dirs.is_empty() {
            return self.search_dirs.clone();
        }

        let mut dirs = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        {
            dirs.push(dir);
        }
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd);
        }
        dirs
    }
}

/// Notification pipeline settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Webhook receiving every reported event. `None` disables delivery.
    pub webhook_url: Option<String>,

    /// Maximum number of events kept for the dashboard.
    pub buffer_capacity: usize,

    /// Upper bound on a single webhook request, in seconds.
    pub webhook_timeout_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            buffer_capacity: 200,
            webhook_timeout_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub log_filter: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "archeblow_ops=info".to_string(),
            json_logs: false,
        }
    }
}
