//! Tracing subscriber setup for the `depo` binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use depo_core::config::LoggingConfig;
use depo_infrastructure::DepoPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_FILE_PREFIX: &str = "depo.log";

/// Installs the global subscriber: a daily rolling file in the log directory
/// and, when `to_stderr` is set, a stderr layer.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// must be held until exit so buffered lines reach the file.
pub fn init(config: &LoggingConfig, to_stderr: bool) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("invalid log level '{}'", config.level))?;

    let directory = log_directory(config)?;
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("creating log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::daily(&directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);
    let stderr_layer =
        to_stderr.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}

fn log_directory(config: &LoggingConfig) -> Result<PathBuf> {
    match config.directory.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(DepoPaths::log_dir()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_directory_wins() {
        let config = LoggingConfig {
            directory: Some("/var/log/depo".to_string()),
            ..LoggingConfig::default()
        };
        assert_eq!(log_directory(&config).unwrap(), PathBuf::from("/var/log/depo"));
    }
}
