//! Logging setup
//!
//! Logs go to a daily file `log-YYYYMMDD.log` in the application's log
//! directory, or to stderr when that file can't be opened. `RUST_LOG`
//! overrides the default level.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Log file for today inside `logs_dir`
pub fn log_file_path(logs_dir: &Path) -> PathBuf {
    logs_dir.join(format!("log-{}.log", Local::now().format("%Y%m%d")))
}

/// Install the global subscriber
///
/// Returns the log file in use, `None` when logging to stderr.
pub fn init(logs_dir: &Path, verbose: bool) -> Result<Option<PathBuf>, TelemetryError> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level).map_err(|source| TelemetryError::EnvFilter {
            value: default_level.to_string(),
            source,
        })?,
    };

    let path = log_file_path(logs_dir);
    let file = fs::create_dir_all(logs_dir)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));

    match file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(TelemetryError::Subscriber)?;
            Ok(Some(path))
        }
        Err(err) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(TelemetryError::Subscriber)?;
            tracing::warn!(path = %path.display(), error = %err, "log file unavailable, logging to stderr");
            Ok(None)
        }
    }
}
