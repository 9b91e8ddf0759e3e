//! Secret resolution subsystem.
//!
//! # Data Flow
//! ```text
//! registry.rs defaults   ─┐
//! api_keys.env / .env    ─┼─▶ sources.rs (read each layer)
//! process environment    ─┘
//!     → chain.rs (fold by precedence, last definition wins)
//!     → ResolvedSecrets (immutable snapshot)
//!     → store.rs (shared handle, explicit reload)
//! ```
//!
//! # Design Decisions
//! - Resolution happens once at startup; no filesystem watching
//! - Undefined (`None`) is distinct from the `N/A` sentinel
//! - A failing optional layer is skipped, not fatal

pub mod chain;
pub mod registry;
pub mod sources;
pub mod store;
pub mod types;

pub use chain::{ResolutionChain, ResolvedSecrets};
pub use store::SecretStore;
pub use types::{SecretName, SecretValue, SecretsError, SourceLayer};
