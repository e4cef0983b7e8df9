// src/logging.rs
// =============================================================================
// Sets up `tracing` so every log line goes to stdout with a timestamp and a
// level, e.g.
//
//   2026-10-17T09:12:03.123Z  INFO link_inspector::inspect::walker: Inspecting folder 'site/docs'
//
// The filter defaults to `info` and can be overridden with RUST_LOG
// (RUST_LOG=debug shows every finding as it is written).
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Filter used when RUST_LOG is not set
const DEFAULT_FILTER: &str = "info";

// Installs the global subscriber.
//
// Only the first call installs anything; later calls return Ok(()) so tests
// and the binary can both call it without fighting over the global slot.
pub fn init_logging() -> Result<()> {
    static INIT: std::sync::OnceLock<()> = std::sync::OnceLock::new();
    if INIT.get().is_some() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .try_init()
        .map_err(|e| anyhow!("tracing setup failed: {e}"))?;

    let _ = INIT.set(());
    Ok(())
}
