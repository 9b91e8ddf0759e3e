//! Per-service API health tracking.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::secrets::registry;

/// Health of one external API as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiHealth {
    Ok,
    Error,
}

/// Rolling status of one external service.
#[derive(Debug, Clone, Serialize)]
pub struct ApiStatus {
    pub service_id: String,
    pub service_name: String,
    pub status: ApiHealth,
    /// Consecutive failures since the last success, not a lifetime total.
    /// A success resets it, so `status_summary` counts only the current
    /// incident.
    pub failures: u32,
    pub last_error: Option<DateTime<Utc>>,
    pub last_error_message: Option<String>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_message: Option<String>,
}

impl ApiStatus {
    fn new(service_id: &str) -> Self {
        Self {
            service_id: service_id.to_string(),
            service_name: registry::display_name(service_id).to_string(),
            status: ApiHealth::Ok,
            failures: 0,
            last_error: None,
            last_error_message: None,
            last_success: None,
            last_message: None,
        }
    }
}

/// Concurrent map of service id → status.
#[derive(Default)]
pub struct ApiStatusTracker {
    services: DashMap<String, ApiStatus>,
}

impl ApiStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed call and return the updated status.
    pub fn record_error(&self, service_id: &str, message: &str) -> ApiStatus {
        let mut entry = self
            .services
            .entry(service_id.to_string())
            .or_insert_with(|| ApiStatus::new(service_id));
        entry.status = ApiHealth::Error;
        entry.failures = entry.failures.saturating_add(1);
        entry.last_error = Some(Utc::now());
        entry.last_error_message = Some(message.to_string());
        entry.last_message = Some(message.to_string());
        entry.clone()
    }

    /// Record a successful call.
    ///
    /// Returns the number of failures it recovered from (zero when the
    /// service was already healthy).
    pub fn record_success(&self, service_id: &str, message: &str) -> u32 {
        let mut entry = self
            .services
            .entry(service_id.to_string())
            .or_insert_with(|| ApiStatus::new(service_id));
        let recovered = entry.failures;
        entry.status = ApiHealth::Ok;
        entry.failures = 0;
        entry.last_success = Some(Utc::now());
        entry.last_message = Some(message.to_string());
        recovered
    }

    pub fn get(&self, service_id: &str) -> Option<ApiStatus> {
        self.services.get(service_id).map(|r| r.value().clone())
    }

    /// All tracked services, sorted by display name.
    pub fn snapshot(&self) -> Vec<ApiStatus> {
        let mut records: Vec<ApiStatus> = self.services.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| a.service_name.cmp(&b.service_name));
        records
    }

    /// Services currently in the error state, sorted by display name.
    pub fn active_incidents(&self) -> Vec<ApiStatus> {
        self.snapshot()
            .into_iter()
            .filter(|s| s.status == ApiHealth::Error)
            .collect()
    }

    /// One-line summary for the dashboard status bar. Counts are
    /// consecutive failures of the current incident.
    pub fn status_summary(&self) -> String {
        let incidents = self.active_incidents();
        if incidents.is_empty() {
            return "All APIs stable".to_string();
        }
        incidents
            .iter()
            .map(|s| format!("{} ({} failures)", s.service_name, s.failures))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
