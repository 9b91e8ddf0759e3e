//! Metrics collection.
//!
//! # Metrics
//! - `archeblow_events_reported_total` (counter): events by level
//! - `archeblow_webhook_dispatch_total` (counter): delivery attempts by outcome
//! - `archeblow_event_buffer_size` (gauge): events currently buffered
//! - `archeblow_secrets_read` (gauge): entries read per source layer

pub fn record_event_reported(level: &'static str) {
    metrics::counter!("archeblow_events_reported_total", "level" => level).increment(1);
}

pub fn record_dispatch(outcome: &'static str) {
    metrics::counter!("archeblow_webhook_dispatch_total", "outcome" => outcome).increment(1);
}

pub fn record_buffer_size(size: usize) {
    metrics::gauge!("archeblow_event_buffer_size").set(size as f64);
}

pub fn record_secrets_read(layer: &'static str, count: usize) {
    metrics::gauge!("archeblow_secrets_read", "layer" => layer).set(count as f64);
}
