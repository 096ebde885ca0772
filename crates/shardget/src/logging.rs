//! Log output for the command line.
//!
//! Logs go to stderr so they never mix with a download written to stdout.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "SHARDGET_LOG";

/// Pick the filter directive: `-v` flags win, then `SHARDGET_LOG`, then `warn`.
fn directive(verbose: u8, from_env: Option<String>) -> String {
    match verbose {
        0 => from_env
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "warn".to_string()),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

pub fn init(verbose: u8) {
    let directive = directive(verbose, std::env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
