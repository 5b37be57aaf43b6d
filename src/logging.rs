//! Tracing subscriber setup for the command-line tools.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to binaries (and to tests that want output).
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Install a stderr `fmt` subscriber honouring `RUST_LOG`.
///
/// `verbose` raises the default level to `debug`.  Calling this more than
/// once is harmless: later calls leave the first subscriber in place.
pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
