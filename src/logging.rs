//! Tracing setup for the analyzer server.
//!
//! Request and pipeline events go to stdout in compact form. Setting `ANALYZER_LOG_FILE` adds a
//! second, ANSI-free layer that appends to that path through a non-blocking writer.
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::load_env_optional;

/// Environment variable naming an optional log file.
pub const LOG_FILE_ENV: &str = "ANALYZER_LOG_FILE";

const DEFAULT_FILTER: &str = "info";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stdout_layer = fmt::layer().with_target(false).compact();
    let file_layer = load_env_optional(LOG_FILE_ENV).and_then(|path| {
        match open_log_writer(Path::new(path.trim())) {
            Ok((writer, guard)) => {
                let _ = LOG_GUARD.set(guard);
                Some(
                    fmt::layer()
                        .with_writer(writer)
                        .with_target(true)
                        .with_ansi(false)
                        .compact(),
                )
            }
            Err(err) => {
                eprintln!("Failed to open log file {path}: {err}");
                None
            }
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

/// Open `path` for appending and wrap it in a non-blocking writer.
///
/// The returned guard flushes pending lines when dropped.
fn open_log_writer(path: &Path) -> io::Result<(NonBlocking, WorkerGuard)> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(tracing_appender::non_blocking(file))
}
