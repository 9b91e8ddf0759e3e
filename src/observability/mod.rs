//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → Log output (stdout, human-readable or JSON)
//!     → Any `metrics` recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Secret values never appear in logs or metric labels
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
