//! Tracing initialization (spec §4.10)

use tracing_subscriber::EnvFilter;

/// Initialize the global `tracing` subscriber. `verbosity` follows the
/// usual CLI convention: 0 = warn, 1 = info, 2 = debug, 3+ = trace,
/// overridable at any level via `RUST_LOG`.
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
