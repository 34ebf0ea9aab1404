//! Tracing subscriber setup for the binaries

use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str = "info";

/// Build the log filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`]
///
/// SQL statement logging from `sqlx` is kept at `warn` unless `RUST_LOG`
/// asks for it.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let filter = EnvFilter::new(DEFAULT_FILTER);
        match "sqlx::query=warn".parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        }
    })
}

/// Install the global `fmt` subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init();
}
