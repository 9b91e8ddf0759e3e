//! Bounded in-memory history of recent events.

use std::collections::VecDeque;
use std::sync::Arc;
use parking_lot::Mutex;

use crate::monitoring::types::NotificationEvent;
use crate::observability::metrics;

/// Fixed-capacity FIFO of events, insertion order = chronological order.
///
/// Safe to share between reporting call sites; insertion and eviction happen
/// under one lock.
pub struct EventBuffer {
    capacity: usize,
    events: Mutex<VecDeque<Arc<NotificationEvent>>>,
}

impl EventBuffer {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append an event, evicting the oldest one when full.
    pub fn append(&self, event: Arc<NotificationEvent>) {
        let len = {
            let mut events = self.events.lock();
            if events.len() == self.capacity {
                if let Some(evicted) = events.pop_front() {
                    tracing::debug!(source = %evicted.source, "Event buffer full, evicting oldest event");
                }
            }
            events.push_back(event);
            events.len()
        };
        metrics::record_buffer_size(len);
    }

    /// The most recent `n` events, newest last.
    pub fn recent(&self, n: usize) -> Vec<Arc<NotificationEvent>> {
        let events = self.events.lock();
        let skip = events.len().saturating_sub(n);
        events.iter().skip(skip).cloned().collect()
    }

    /// The most recent `n` events from one source, newest last.
    pub fn recent_for_source(&self, source: &str, n: usize) -> Vec<Arc<NotificationEvent>> {
        self.recent_matching(n, |e| e.source == source)
    }

    /// The most recent `n` events accepted by `predicate`, newest last.
    pub fn recent_matching<F>(&self, n: usize, predicate: F) -> Vec<Arc<NotificationEvent>>
    where
        F: Fn(&NotificationEvent) -> bool,
    {
        let events = self.events.lock();
        let mut matched: Vec<_> = events
            .iter()
            .rev()
            .filter(|e| predicate(e))
            .take(n)
            .cloned()
            .collect();
        matched.reverse();
        matched
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
