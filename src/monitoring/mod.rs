//! Error notification subsystem.
//!
//! # Data Flow
//! ```text
//! report(level, source, message, details)
//!     → event.rs (stamp + build NotificationEvent)
//!     → buffer.rs (always appended, oldest evicted)
//!     → webhook.rs (single best-effort POST, or Skipped)
//!     → DispatchOutcome (logged, never raised)
//!
//! record_api_error / record_api_success
//!     → api_status.rs (per-service health)
//!     → report(...)
//!
//! schedule_watch(address, network, days)
//!     → watches.rs (expiring per-address registry)
//!     → report(Info, "monitoring", ...)
//! ```
//!
//! # Design Decisions
//! - Buffer ordering is synchronous and unaffected by dispatch latency
//! - Dispatch is bounded by a timeout and never retried
//! - Dashboard consumption is pull-based (`recent_events`)

pub mod api_status;
pub mod buffer;
pub mod event;
pub mod pipeline;
pub mod types;
pub mod watches;
pub mod webhook;

pub use buffer::EventBuffer;
pub use pipeline::{NotificationPipeline, Report};
pub use types::{Details, DispatchOutcome, Level, NotificationEvent};
pub use watches::{Network, Watch, WatchRegistry};
pub use webhook::WebhookDispatcher;
