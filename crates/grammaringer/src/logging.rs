//! Tracing setup: human-readable stdout plus a daily rolling JSON file.

use crate::{AppError, AppResult};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub(crate) const DEFAULT_LOG_FILTER: &str = "grammaringer=info,grammaringer_core=info";

const LOG_FILE_PREFIX: &str = "grammaringer.log";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
#[track_caller]
pub(crate) fn init(log_dir: &Path) -> AppResult<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().json().with_writer(file_writer))
        .try_init()
        .map_err(|e| AppError::ConfigError {
            reason: format!("Failed to install tracing subscriber: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(guard)
}

/// Fallback when the log directory is unavailable: stdout only.
pub(crate) fn init_stdout_only() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
