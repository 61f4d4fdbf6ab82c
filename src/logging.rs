//! Log output for the binary.
//!
//! The filter comes from `POKESOCIAL_LOG`, then `RUST_LOG`, then `warn`.
//! Logs go to stderr so command output on stdout stays clean.

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "POKESOCIAL_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Build the filter from whichever directive source is set first.
pub fn filter_from(primary: Option<String>, fallback: Option<String>) -> EnvFilter {
    let set = |d: &String| !d.trim().is_empty();
    let directives = primary
        .filter(set)
        .or(fallback.filter(set))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init() {
    let filter = filter_from(
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
    );
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
