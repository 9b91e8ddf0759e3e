//! Best-effort webhook delivery.
//!
//! # Responsibilities
//! - POST each event as JSON to the configured URL
//! - Bound every attempt with a timeout
//! - Turn every failure into a [`DispatchOutcome`] instead of an error
//!
//! # Design Decisions
//! - Single attempt, no retry queue
//! - No URL configured means no network activity at all

use std::time::Duration;
use tokio::time::timeout;

use crate::config::MonitoringConfig;
use crate::monitoring::types::{DispatchOutcome, NotificationEvent};
use crate::observability::metrics;

/// Delivers events to an optional webhook endpoint.
#[derive(Clone)]
pub struct WebhookDispatcher {
    endpoint: Option<String>,
    client: reqwest::Client,
    timeout_duration: Duration,
}

impl WebhookDispatcher {
    pub fn new(endpoint: Option<String>, timeout_duration: Duration) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
            timeout_duration,
        }
    }

    pub fn from_config(config: &MonitoringConfig) -> Self {
        Self::new(
            config.webhook_url.clone(),
            Duration::from_secs(config.webhook_timeout_secs),
        )
    }

    /// A dispatcher that never sends anything.
    pub fn disabled() -> Self {
        Self::new(None, Duration::from_secs(5))
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Attempt delivery once. Never returns an error.
    pub async fn dispatch(&self, event: &NotificationEvent) -> DispatchOutcome {
        let Some(endpoint) = &self.endpoint else {
            return DispatchOutcome::Skipped;
        };

        let request = self.client.post(endpoint).json(event).send();

        let outcome = match timeout(self.timeout_duration, request).await {
            Ok(Ok(response)) => {
                let status = response.status();
                if status.is_success() {
                    DispatchOutcome::Delivered
                } else {
                    DispatchOutcome::Failed(format!("webhook returned HTTP {}", status))
                }
            }
            Ok(Err(e)) => DispatchOutcome::Failed(format!("transport error: {}", e)),
            Err(_) => DispatchOutcome::Failed(format!(
                "timed out after {}ms",
                self.timeout_duration.as_millis()
            )),
        };

        match &outcome {
            DispatchOutcome::Failed(reason) => {
                tracing::warn!(
                    endpoint = %endpoint,
                    source = %event.source,
                    reason = %reason,
                    "Webhook delivery failed"
                );
            }
            _ => {
                tracing::debug!(endpoint = %endpoint, source = %event.source, "Webhook delivered");
            }
        }
        metrics::record_dispatch(outcome.as_str());

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::event::format;
    use crate::monitoring::types::{Details, Level};

    #[tokio::test]
    async fn test_skipped_without_endpoint() {
        let dispatcher = WebhookDispatcher::disabled();
        let event = format(Level::Error, "svc", "boom", Details::new());

        assert!(!dispatcher.is_enabled());
        assert_eq!(dispatcher.dispatch(&event).await, DispatchOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_quietly() {
        // Port 9 on loopback is normally closed.
        let dispatcher = WebhookDispatcher::new(
            Some("http://127.0.0.1:9/hook".into()),
            Duration::from_secs(2),
        );
        let event = format(Level::Error, "svc", "boom", Details::new());

        assert!(matches!(
            dispatcher.dispatch(&event).await,
            DispatchOutcome::Failed(_)
        ));
    }
}
