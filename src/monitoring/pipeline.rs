//! Notification pipeline: format → buffer → dispatch.
//!
//! # Design Decisions
//! - Buffering always happens before dispatch and never depends on it
//! - Dispatch outcomes are returned for inspection but never raised
//! - Each report is independent of every other report

use std::sync::Arc;

use crate::config::MonitoringConfig;
use crate::monitoring::api_status::{ApiStatus, ApiStatusTracker};
use crate::monitoring::buffer::EventBuffer;
use crate::monitoring::event;
use crate::monitoring::types::{Details, DispatchOutcome, Level, NotificationEvent};
use crate::monitoring::watches::{Network, Watch, WatchRegistry};
use crate::monitoring::webhook::WebhookDispatcher;
use crate::observability::metrics;
use crate::secrets::registry;

/// What happened to one reported event.
#[derive(Debug, Clone)]
pub struct Report {
    pub event: Arc<NotificationEvent>,
    pub outcome: DispatchOutcome,
}

/// Shared entry point for every error-reporting call site.
#[derive(Clone)]
pub struct NotificationPipeline {
    buffer: Arc<EventBuffer>,
    dispatcher: WebhookDispatcher,
    api_status: Arc<ApiStatusTracker>,
    watches: Arc<WatchRegistry>,
}

const WATCH_SOURCE: &str = "monitoring";
const WATCH_SERVICE_NAME: &str = "Monitoring system";

impl NotificationPipeline {
    pub fn new(buffer: EventBuffer, dispatcher: WebhookDispatcher) -> Self {
        Self {
            buffer: Arc::new(buffer),
            dispatcher,
            api_status: Arc::new(ApiStatusTracker::new()),
            watches: Arc::new(WatchRegistry::new()),
        }
    }

    pub fn from_config(config: &MonitoringConfig) -> Self {
        Self::new(
            EventBuffer::new(config.buffer_capacity),
            WebhookDispatcher::from_config(config),
        )
    }

    /// Format and buffer an event without dispatching it.
    fn record(
        &self,
        level: Level,
        source: &str,
        message: &str,
        details: Details,
    ) -> Arc<NotificationEvent> {
        let event = Arc::new(event::format(level, source, message, details));

        match level {
            Level::Info => tracing::info!(source = %source, "{}", message),
            Level::Warning => tracing::warn!(source = %source, "{}", message),
            Level::Error => tracing::error!(source = %source, "{}", message),
        }
        metrics::record_event_reported(level.as_str());

        self.buffer.append(event.clone());
        event
    }

    /// Report an event and wait for the single delivery attempt.
    pub async fn report(
        &self,
        level: Level,
        source: &str,
        message: &str,
        details: Details,
    ) -> Report {
        let event = self.record(level, source, message, details);
        let outcome = self.dispatcher.dispatch(&event).await;
        Report { event, outcome }
    }

    /// Report an event, buffering it immediately and delivering it from a
    /// spawned task.
    ///
    /// Outside a tokio runtime the event is buffered but not delivered.
    pub fn report_detached(
        &self,
        level: Level,
        source: &str,
        message: &str,
        details: Details,
    ) -> Arc<NotificationEvent> {
        let event = self.record(level, source, message, details);

        if self.dispatcher.is_enabled() {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let dispatcher = self.dispatcher.clone();
                    let queued = event.clone();
                    handle.spawn(async move {
                        dispatcher.dispatch(&queued).await;
                    });
                }
                Err(_) => {
                    tracing::warn!(source = %source, "No async runtime, webhook delivery skipped");
                }
            }
        }

        event
    }

    /// Mark a service call as failed and report it as an error event.
    pub async fn record_api_error(
        &self,
        service_id: &str,
        message: &str,
        details: Details,
    ) -> Report {
        let status = self.api_status.record_error(service_id, message);
        let details = with_service(details, service_id, &status.service_name);
        self.report(Level::Error, service_id, message, details).await
    }

    /// Mark a service call as successful. An info event is reported only
    /// when the service recovers from failures.
    pub async fn record_api_success(
        &self,
        service_id: &str,
        message: &str,
        details: Details,
    ) -> Option<Report> {
        let recovered = self.api_status.record_success(service_id, message);
        if recovered == 0 {
            return None;
        }
        let name = registry::display_name(service_id).to_string();
        let mut details = with_service(details, service_id, &name);
        details.insert("recovered_failures".to_string(), recovered.into());
        Some(self.report(Level::Info, service_id, message, details).await)
    }

    /// Place an address under observation for `days` days and announce it
    /// with an info event.
    pub async fn schedule_watch(
        &self,
        address: &str,
        network: Network,
        days: u32,
        comment: Option<&str>,
    ) -> (Watch, Report) {
        let watch = self.watches.schedule(address, network, days, comment);

        let mut details = Details::new();
        details.insert("address".to_string(), watch.address.clone().into());
        details.insert("network".to_string(), network.as_str().into());
        details.insert("expires_at".to_string(), watch.expires_at.to_rfc3339().into());
        details.insert("days".to_string(), days.into());
        details.insert("comment".to_string(), watch.comment.clone().into());
        details.insert("service_name".to_string(), WATCH_SERVICE_NAME.into());

        let message = format!(
            "Monitoring enabled for address {} ({}).",
            watch.address,
            network.as_str().to_uppercase()
        );
        let report = self.report(Level::Info, WATCH_SOURCE, &message, details).await;
        (watch, report)
    }

    /// Unexpired watches, soonest expiry first.
    pub fn active_watches(&self) -> Vec<Watch> {
        self.watches.active()
    }

    pub fn watch_for(&self, address: &str, network: Network) -> Vec<Watch> {
        self.watches.watch_for(address, network)
    }

    /// Buffered events whose details name this address (any case) on this
    /// network, newest last.
    pub fn events_for(
        &self,
        address: &str,
        network: Network,
        limit: usize,
    ) -> Vec<Arc<NotificationEvent>> {
        let address = address.to_lowercase();
        self.buffer.recent_matching(limit, |e| {
            let detail = |key: &str| e.details.get(key).and_then(|v| v.as_str());
            detail("address").map(str::to_lowercase).as_deref() == Some(address.as_str())
                && detail("network") == Some(network.as_str())
        })
    }

    /// The most recent `n` events, newest last.
    pub fn recent_events(&self, n: usize) -> Vec<Arc<NotificationEvent>> {
        self.buffer.recent(n)
    }

    pub fn recent_events_for(&self, source: &str, n: usize) -> Vec<Arc<NotificationEvent>> {
        self.buffer.recent_for_source(source, n)
    }

    pub fn api_status_snapshot(&self) -> Vec<ApiStatus> {
        self.api_status.snapshot()
    }

    pub fn active_incidents(&self) -> Vec<ApiStatus> {
        self.api_status.active_incidents()
    }

    pub fn status_summary(&self) -> String {
        self.api_status.status_summary()
    }

    pub fn buffer(&self) -> &EventBuffer {
        &self.buffer
    }

    pub fn dispatcher(&self) -> &WebhookDispatcher {
        &self.dispatcher
    }
}

fn with_service(mut details: Details, service_id: &str, service_name: &str) -> Details {
    details.insert("service_id".to_string(), service_id.into());
    details
        .entry("service_name")
        .or_insert_with(|| service_name.into());
    details
}
