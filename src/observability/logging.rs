//! Log subscriber setup.
//!
//! Both `tracing` events and `log` records (bridged by tracing-subscriber)
//! go to stderr so stdout stays free for report output.

use tracing_subscriber::EnvFilter;

/// Directive for a `-v` count: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `verbosity` when set.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
