//! Tracing/logging initialization.
//!
//! Structured JSON logs, filtered via `RUST_LOG`. Stream lifecycle events
//! (pipeline starts, keep-alive teardowns, backend rejections) land here at
//! debug/warn level.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset: workspace crates at debug so
/// stream lifecycle events show up, everything else at info.
const DEFAULT_FILTER: &str = "duka_store=debug,duka_repository=debug,duka_dashboard=debug,info";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        // Targets distinguish which layer (store, repository, dashboard)
        // emitted a lifecycle event.
        .with_target(true)
        .try_init();
}
