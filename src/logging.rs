//! Logging init: stderr, env-filter controlled.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr. The default filter shows this
/// crate's own info lines (the path -> gist filename mapping); override
/// with `RUST_LOG` for more.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,gistit=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();
}
