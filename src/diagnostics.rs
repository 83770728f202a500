//! Diagnostic channel
//!
//! Failures inside the logger are reported through `tracing`. This installs a
//! subscriber that prints those events to stderr, keeping them out of the log
//! files the logger itself writes.

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the diagnostic filter directives
pub const FILTER_ENV: &str = "RECORD_LOG_DIAG";

/// Filter used when `RECORD_LOG_DIAG` is unset or invalid
pub const DEFAULT_FILTER: &str = "record_log=warn";

/// Initialize the diagnostic subscriber
///
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_env(FILTER_ENV)
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize diagnostics: {}", e))
}
