//! Diagnostic logging setup
//!
//! The library emits `tracing` events; the binary installs a subscriber once at
//! startup. Output goes to stderr so command output on stdout stays clean.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

/// Environment variable holding the log filter (e.g. `debug`, `tally=trace`)
pub const LOG_FILTER_ENV: &str = "TALLY_LOG";

/// Install the global tracing subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    // A subscriber is already installed (tests, embedding applications)
    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_ignored() {
        init_tracing(LogFormat::Pretty);
        init_tracing(LogFormat::Json);
        tracing::debug!("still logging after a second init");
    }
}
