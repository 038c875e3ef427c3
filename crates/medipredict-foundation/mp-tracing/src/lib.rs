//! # MediPredict Tracing
//!
//! Unified tracing initialization for MediPredict services.
//!
//! ## Features
//!
//! - **Layered Tracing**: stdout formatting plus environment filtering
//! - **Rolling Log Files**: optional daily-rotated log files with bounded retention
//! - **Guard Pattern**: buffered file output is flushed when the guard drops
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mp_tracing::{init, TracingConfig};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = TracingConfig::new("risk-api", "info").with_log_dir("logs");
//!     let _guard = init(config)?;
//!
//!     info!("Service started");
//!     Ok(())
//! }
//! ```

use mp_error::{MpError, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Global flag to track if tracing has been initialized
static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Valid values for [`TracingConfig::log_level`].
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration for tracing initialization.
///
/// ## Fields
///
/// - `service_name`: Must be non-empty and contain only alphanumeric
///   characters, hyphens, and underscores.
/// - `log_level`: Minimum level when `RUST_LOG` is not set.
/// - `log_dir`: When set, logs are also written to rolling files in this directory.
/// - `file_name`: Prefix of the rolling log files.
/// - `max_files`: Number of rotated files kept on disk.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub service_name: String,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub file_name: String,
    pub max_files: usize,
}

impl TracingConfig {
    /// Stdout-only configuration.
    #[must_use]
    pub fn new(service_name: impl Into<String>, log_level: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            log_level: log_level.into(),
            log_dir: None,
            file_name: "app.log".to_string(),
            max_files: 10,
        }
    }

    #[must_use]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    #[must_use]
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Validates the configuration.
    ///
    /// ## Errors
    ///
    /// - `MpError::InvalidInput` if `service_name` is empty or contains invalid characters
    /// - `MpError::InvalidInput` if `log_level` is not a valid log level
    /// - `MpError::InvalidInput` if file logging is enabled with `max_files == 0`
    pub fn validate(&self) -> Result<()> {
        if self.service_name.is_empty() {
            return Err(MpError::invalid_input(
                "service_name",
                "service name cannot be empty",
            ));
        }

        if !self
            .service_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(MpError::invalid_input(
                "service_name",
                "service name must contain only alphanumeric characters, hyphens, and underscores",
            ));
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(MpError::invalid_input(
                "log_level",
                format!(
                    "invalid log level '{}', must be one of: {}",
                    self.log_level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        if self.log_dir.is_some() {
            if self.file_name.is_empty() {
                return Err(MpError::invalid_input(
                    "file_name",
                    "log file name cannot be empty",
                ));
            }
            if self.max_files == 0 {
                return Err(MpError::invalid_input(
                    "max_files",
                    "at least one log file must be retained",
                ));
            }
        }

        Ok(())
    }
}

/// Guard for tracing cleanup.
///
/// Holds the background writer of the file layer, if any. Dropping it flushes
/// buffered log lines, so keep it alive for the lifetime of `main`.
#[derive(Debug)]
pub struct TracingGuard {
    file_guard: Option<WorkerGuard>,
}

impl TracingGuard {
    /// Returns `true` if a file layer is active.
    #[must_use]
    pub fn writes_to_file(&self) -> bool {
        self.file_guard.is_some()
    }
}

/// Initializes the tracing subsystem with the provided configuration.
///
/// This function sets up:
/// - Environment-based log level filtering (`RUST_LOG` wins over `log_level`)
/// - A formatted stdout logger
/// - A rolling file logger when `log_dir` is configured
///
/// ## Errors
///
/// - `MpError::InvalidInput` if the configuration is invalid
/// - `MpError::Telemetry` if tracing has already been initialized
/// - `MpError::Telemetry` if the log directory cannot be prepared or the
///   subscriber cannot be set
pub fn init(config: TracingConfig) -> Result<TracingGuard> {
    config.validate()?;

    if TRACING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(MpError::telemetry("tracing has already been initialized"));
    }

    let result = install(&config);
    if result.is_err() {
        TRACING_INITIALIZED.store(false, Ordering::SeqCst);
    }
    result
}

fn install(config: &TracingConfig) -> Result<TracingGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_thread_ids(true);

    let (file_layer, file_guard) = match &config.log_dir {
        Some(dir) => {
            let appender = rolling_appender(config, dir)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| MpError::telemetry(format!("failed to initialize tracing: {e}")))?;

    tracing::info!(
        service = %config.service_name,
        log_dir = ?config.log_dir,
        "tracing initialized"
    );

    Ok(TracingGuard { file_guard })
}

fn rolling_appender(config: &TracingConfig, dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir).map_err(|e| {
        MpError::telemetry(format!(
            "failed to create log directory {}: {e}",
            dir.display()
        ))
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.file_name)
        .max_log_files(config.max_files)
        .build(dir)
        .map_err(|e| MpError::telemetry(format!("failed to create log file appender: {e}")))
}
