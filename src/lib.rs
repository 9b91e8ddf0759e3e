//! Secret resolution and error notification for the ArcheBlow desktop app.

pub mod config;
pub mod lifecycle;
pub mod monitoring;
pub mod observability;
pub mod secrets;

pub use config::schema::AppConfig;
pub use lifecycle::Services;
pub use monitoring::{DispatchOutcome, Level, NotificationEvent};
pub use secrets::{SecretValue, SourceLayer};
