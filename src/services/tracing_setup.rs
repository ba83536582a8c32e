//! Tracing subscriber setup
//!
//! This module provides shared tracing configuration used by both
//! the command line tool and tests.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// Logs go to `log_file_path` when given, otherwise to stderr. Filtering
/// follows `RUST_LOG`, defaulting to INFO.
///
/// Returns false if a log file was requested but could not be created, or a
/// global subscriber was already installed.
pub fn init_global(log_file_path: Option<&Path>) -> bool {
    match log_file_path {
        Some(path) => match File::create(path) {
            Ok(file) => build_subscriber(file, env_filter()).try_init().is_ok(),
            Err(_) => false,
        },
        None => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(env_filter())
            .try_init()
            .is_ok(),
    }
}

/// Build a subscriber writing to `log_file`.
pub fn build_subscriber(
    log_file: File,
    env_filter: EnvFilter,
) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
}

/// Filter from `RUST_LOG`, INFO when unset or invalid
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_subscriber_writes_to_log_file() {
        let log_file = NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log_file.reopen().unwrap(), EnvFilter::new("info"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("Request for http://host/ failed");
        });

        let contents = std::fs::read_to_string(log_file.path()).unwrap();
        assert!(contents.contains("WARN"), "Log should contain WARN level");
        assert!(
            contents.contains("Request for http://host/ failed"),
            "Log should contain message"
        );
    }

    #[test]
    fn test_subscriber_skips_trace_by_default() {
        let log_file = NamedTempFile::new().unwrap();
        let subscriber = build_subscriber(log_file.reopen().unwrap(), EnvFilter::new("info"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!("toggle_expansion");
        });

        let contents = std::fs::read_to_string(log_file.path()).unwrap_or_default();
        assert!(!contents.contains("toggle_expansion"));
    }
}
