//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured `[logging].level`.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_lowercase()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
