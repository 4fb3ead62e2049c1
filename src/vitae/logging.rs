//! Log output for binaries embedding the store.
//!
//! The library only emits `tracing` events. This installs a stderr `fmt` subscriber
//! filtered by `VITAE_LOG` (standard `EnvFilter` syntax).

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "VITAE_LOG";

/// Install the global subscriber. Calling it again is a no-op.
pub fn init(verbose: bool) {
    let fallback = if verbose { "vitae=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
