//! Logging setup
//!
//! `RUST_LOG` wins when set (e.g. `RUST_LOG=bft=trace`); otherwise the level
//! follows `--verbose` / `--quiet`. Logs go to stderr so piped table output
//! stays clean.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter for the given verbosity flags
pub fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "bft=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Initialize the global subscriber
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .try_init();
}
