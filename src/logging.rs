//! # Observability & Logging
//!
//! The navigator logs through `tracing` with structured fields:
//!
//! - **Cache**: hits, misses and registrations (`debug`)
//! - **Fetches**: completed `GET`s with their status (`info`)
//! - **Failures**: one warning per failed `GET`, routed through the configured [`Logger`]
//!
//! ```bash
//! # Fetches only
//! RUST_LOG=info cargo test
//!
//! # Cache traffic as well
//! RUST_LOG=hal_navigator=debug cargo test
//! ```
//!
//! The warning goes through a [`Logger`] rather than straight to `tracing` so callers can
//! route transport failures somewhere else (or count them in tests).

/// Sink for the warning emitted on every failed `GET`.
pub trait Logger: Send + Sync {
    fn warn(&self, message: &str);
}

/// Default [`Logger`]: forwards to `tracing::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Initializes a compact `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
