use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable read before `RUST_LOG`.
pub const LOG_ENV: &str = "APIDRIFT_LOG";

/// Filter directive for a `-v` count when no environment override is set.
pub fn filter_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)))
}

/// Install the global subscriber writing to stderr.
///
/// Calling it again is a no-op, which keeps tests and embedders safe.
pub fn init_logging(verbosity: u8) {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter(verbosity))
        .try_init();
}
