//! Logging setup.
//!
//! Progress is always printed to stdout, since this runs as a container
//! startup step whose output ends up in the container log. Journald and a
//! rolling log file can be added on top through the `[logging]` config
//! section.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Environment variable holding the log filter, e.g. `AUTO_LIBRARY_LOG=debug`.
pub const LOG_ENV: &str = "AUTO_LIBRARY_LOG";

/// Initialize the global subscriber. Call once, before the run starts.
///
/// Log level comes from `AUTO_LIBRARY_LOG` and defaults to `info`. When a
/// log file is configured the returned guard must be held until exit, or
/// buffered lines are lost.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = fmt::layer().with_target(false);

    #[cfg(target_os = "linux")]
    let journald_layer = if config.journald {
        match tracing_journald::layer() {
            Ok(layer) => Some(layer),
            Err(e) => {
                eprintln!("journald unavailable, logging to stdout only: {}", e);
                None
            }
        }
    } else {
        None
    };
    #[cfg(not(target_os = "linux"))]
    let journald_layer: Option<tracing_subscriber::layer::Identity> = None;

    let mut guard = None;
    let file_layer = match &config.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)
                .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

            let file_appender = tracing_appender::rolling::daily(log_dir, "auto-library.log");
            let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(file_guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(journald_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    tracing::debug!(
        journald = config.journald,
        log_dir = ?config.log_dir,
        "Logging initialized"
    );
    Ok(guard)
}
