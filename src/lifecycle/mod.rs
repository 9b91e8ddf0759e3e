//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Resolve secrets → Build notification pipeline
//!     → Services handed to the host application
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then secrets, then monitoring
//! - Process-wide state is an explicit value, never a module-level global

pub mod startup;

pub use startup::{Services, StartupError};
