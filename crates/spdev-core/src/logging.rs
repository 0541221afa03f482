//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable controlling the log filter
pub const LOG_ENV_VAR: &str = "SPDEV_LOG";

const DEFAULT_FILTER: &str =
    "smart_parking_dev=info,spdev_app=info,spdev_daemon=info,spdev_core=info,warn";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/smart-parking-dev/logs/` (platform data dir).
/// Stdout belongs to the console reporter, so nothing is logged there.
///
/// # Examples
/// ```bash
/// SPDEV_LOG=debug spdev-start
/// ```
pub fn init(entry_point: &str) -> Result<()> {
    let log_dir = get_log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "spdev.log");

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|e| crate::Error::terminal(format!("Failed to install logger: {}", e)))?;

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("{} starting", entry_point);
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Get the log directory path
pub fn get_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("smart-parking-dev").join("logs")
}
