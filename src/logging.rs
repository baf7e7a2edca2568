//! Structured logging setup.
//!
//! The kernel only emits `tracing` events; installing a subscriber is left
//! to the host. [`init_logging`] installs the stock formatter, with
//! `RUST_LOG` taking precedence over the configured filter.

use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a global `fmt` subscriber. Returns `false` if one was already
/// installed.
pub fn init_logging(filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
