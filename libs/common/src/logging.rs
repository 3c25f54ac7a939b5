//! Logging initialisation

use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Install the global fmt subscriber
///
/// The filter is read from `RUST_LOG` and falls back to [`DEFAULT_FILTER`].
/// Must be called once, before the first log line.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_target(false)
        .init();
}
