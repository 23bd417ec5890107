//! Logging setup for the rq-core binary.
//!
//! stdout is reserved for command payloads; all log output goes to
//! stderr. The library modules only emit `tracing` events and never
//! install a subscriber, so embedding runtimes keep full control of
//! their own logging.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber, honoring `RUST_LOG` when set and the
/// `-v` count otherwise.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "rq_core=warn",
        1 => "rq_core=info",
        2 => "rq_core=debug",
        _ => "rq_core=trace",
    }
}
