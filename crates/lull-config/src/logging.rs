//! Tracing subscriber setup for the lull binaries.
//!
//! Filter priority, highest first:
//! 1. `LULL_LOG`
//! 2. `RUST_LOG`
//! 3. `logging.level` from the config file
//! 4. `warn`

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::{ConfigError, LoggingConfig};

/// Project-specific filter variable
pub const LOG_ENV: &str = "LULL_LOG";

const FALLBACK_LEVEL: &str = "warn";

/// Build the filter from the environment and the configured level
pub fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Log to stderr
pub fn init_stderr(config: &LoggingConfig) -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}

/// Append logs to `path`; used when the terminal belongs to the renderer
pub fn init_file(config: &LoggingConfig, path: &Path) -> Result<(), ConfigError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ConfigError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
            file: None,
        }
    }

    #[test]
    #[serial]
    fn test_project_variable_wins() {
        std::env::set_var(LOG_ENV, "lull_core=trace");
        std::env::set_var("RUST_LOG", "error");
        let filter = build_env_filter(&config("info"));
        std::env::remove_var(LOG_ENV);
        std::env::remove_var("RUST_LOG");

        assert_eq!(filter.to_string(), "lull_core=trace");
    }

    #[test]
    #[serial]
    fn test_config_level_used_without_env() {
        std::env::remove_var(LOG_ENV);
        std::env::remove_var("RUST_LOG");
        let filter = build_env_filter(&config("lull_core=debug"));
        assert_eq!(filter.to_string(), "lull_core=debug");
    }

    #[test]
    #[serial]
    fn test_unparseable_level_falls_back_to_warn() {
        std::env::remove_var(LOG_ENV);
        std::env::remove_var("RUST_LOG");
        let filter = build_env_filter(&config("lull_core=loudest"));
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("lull.log");

        let err = init_file(&config("info"), &path).unwrap_err();
        match &err {
            ConfigError::LogFile { path: reported, .. } => assert_eq!(reported, &path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("Failed to open log file"));
    }
}
