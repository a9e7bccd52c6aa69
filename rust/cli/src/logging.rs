//! Diagnostic logging for the binary.
//!
//! Engine events go through `tracing`; the CLI installs a formatting
//! subscriber on stderr so stdout stays clean for command output.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,clockpatience_engine=info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Returns `false` if one was already set,
/// which happens when `run` is called more than once in a process.
pub fn init_logging() -> bool {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
