//! Logging configuration and initialization
//!
//! Diagnostics go to stderr so stdout carries nothing but `bulk:` lines.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count
#[must_use]
pub const fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing for the application
pub fn init_logging(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level(verbose)))
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_line_number(verbose >= 3)
        .init();

    debug!("bulk started with verbosity level: {verbose}");
}
