//! Logging setup: a stderr `tracing` subscriber filtered by `PIPER_LOG`.

use std::env;

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

/// Env var holding an `EnvFilter` directive (e.g. `piper=debug`).
pub const LOG_ENV: &str = "PIPER_LOG";

static INIT: OnceCell<()> = OnceCell::new();

fn filter_directive(verbose: bool) -> String {
    match env::var(LOG_ENV) {
        Ok(v) if !v.trim().is_empty() => v,
        _ if verbose => "piper=debug".to_string(),
        _ => "warn".to_string(),
    }
}

/// Install the global subscriber once; later calls are no-ops.
pub fn telemetry_init(verbose: bool) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_new(filter_directive(verbose))
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
