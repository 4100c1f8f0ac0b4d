// Structured logging setup.
//
// The library itself only emits `tracing` events. Binaries and tests that
// want to see them call `init` once at startup.

use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is not set.
pub const DEFAULT_FILTER: &str = "personalizer=info";

/// Install a fmt subscriber filtered by RUST_LOG, falling back to
/// `default_filter`. Returns false if a global subscriber was already set.
pub fn init(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init()
        .is_ok()
}
