//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(configured_level: &str, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        configured_level.to_string()
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// machine-readable.
pub fn init(configured_level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(configured_level, verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
