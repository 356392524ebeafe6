//! Log setup for the console binaries.

use std::{fs::OpenOptions, path::Path, sync::Arc};

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::Error;

/// The log level used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "debug";

/// Send logs to the file at `log_path`, appending to it if it exists.
///
/// Logs are only written to the file because stdout carries the menu.
/// The level defaults to [DEFAULT_LOG_LEVEL] and can be overridden with the
/// `RUST_LOG` environment variable.
///
/// # Errors
///
/// Returns an [Error::Io] if the log file cannot be opened or a global
/// subscriber has already been set.
pub fn setup_logging(log_path: &Path) -> Result<(), Error> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let file_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(file_log.with_filter(filter))
        .try_init()
        .map_err(|error| Error::Io(error.to_string()))
}
