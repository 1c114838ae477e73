//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.
//! `RUST_LOG` takes precedence over the configured level.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional JSON format and daily rolling file output
///
/// Safe to call more than once: later calls are ignored.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    let file_appender = log_dir.and_then(|dir| {
        let log_path = Path::new(dir);
        if !log_path.exists() && std::fs::create_dir_all(log_path).is_err() {
            eprintln!("Cannot create log directory {dir}, logging to stdout only");
            return None;
        }
        Some(tracing_appender::rolling::daily(log_path, "waiting-server"))
    });

    // try_init: tests may install the subscriber several times
    let result = match (file_appender, json.unwrap_or(false)) {
        (Some(appender), true) => builder
            .json()
            .with_writer(appender)
            .with_ansi(false)
            .try_init(),
        (Some(appender), false) => builder.with_writer(appender).with_ansi(false).try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };
    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_logger_with_file(Some("debug"), Some(false), None);
        init_logger();
    }

    #[test]
    fn test_creates_missing_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        init_logger_with_file(Some("info"), Some(true), logs.to_str());
        assert!(logs.exists());
    }
}
