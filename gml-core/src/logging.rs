//! Structured logging using **tracing**.
//!
//! Logs go to stderr as JSON so stdout stays free for `--stdout` and `--json`
//! output. Filtering follows `RUST_LOG` (e.g. `RUST_LOG=gml_core=debug`);
//! without it only errors are shown.

use tracing::error;

use crate::error::GmlError;

/// Initializes the global tracing subscriber.
///
/// Call *once* at program start. Library users (e.g. `build.rs`) can skip it.
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Logs a fatal pipeline error with its kind and path.
pub fn log_failure(err: &GmlError) {
    match err.path() {
        Some(path) => error!(kind = err.kind(), path = %path.display(), detail = %err),
        None => error!(kind = err.kind(), detail = %err),
    }
}
