//! # Logging Utilities
//!
//! Logging infrastructure for statusfs using `tracing`.
//!
//! This module provides structured logging with support for:
//! - Multiple output formats (JSON for production, pretty for development)
//! - Environment variable configuration
//! - Console and file output
//! - Changing the level at runtime through a [`LogReloadHandle`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use statusfs_utils::init_logging;
//!
//! // Initialize with default settings (reads from RUST_LOG env var)
//! let handle = init_logging().expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! handle.set_level(statusfs_utils::LogLevel::Debug).expect("reload");
//! tracing::debug!("Now visible");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=statusfs_core=debug`)
//! - `STATUSFS_LOG_FORMAT`: Set output format (`json` or `pretty`, default: `pretty`)
//! - `STATUSFS_LOG_FILE`: Optional path to log file (if not set, logs only to console)

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Layer, Registry};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default for development)
    Pretty,
    /// JSON format (default for production)
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            )),
        }
    }
}

type Base = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<Base> + Send + Sync>;

/// Handle for changing the active level filter after initialization.
#[derive(Clone)]
pub struct LogReloadHandle
{
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogReloadHandle
{
    /// Replace the active filter with a plain level filter.
    ///
    /// ## Errors
    ///
    /// Returns an error if the subscriber holding the filter has been dropped.
    pub fn set_level(&self, level: LogLevel) -> Result<(), LoggingError>
    {
        let filter = EnvFilter::new(Level::from(level).to_string());
        self.handle
            .reload(filter)
            .map_err(|e| LoggingError::ReloadFailed(e.to_string()))
    }

    /// The active filter, rendered as a directive string.
    #[must_use]
    pub fn current(&self) -> Option<String>
    {
        self.handle.with_current(ToString::to_string).ok()
    }
}

impl std::fmt::Debug for LogReloadHandle
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("LogReloadHandle").field("current", &self.current()).finish()
    }
}

/// Initialize logging with default settings
///
/// Reads configuration from environment variables:
/// - `RUST_LOG`: Log level filter (e.g., `debug`, `statusfs_core=debug`)
/// - `STATUSFS_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
/// - `STATUSFS_LOG_FILE`: Optional path to log file
///
/// ## Errors
///
/// Returns an error if:
/// - Logging is already initialized
/// - File logging fails (if `STATUSFS_LOG_FILE` is set)
pub fn init_logging() -> Result<LogReloadHandle, LoggingError>
{
    // Read format from environment or default to pretty
    let format = env::var("STATUSFS_LOG_FORMAT")
        .ok()
        .and_then(|s| LogFormat::from_str(&s).ok())
        .unwrap_or(LogFormat::Pretty);

    // Read log level from RUST_LOG or default to INFO
    let default_level = env::var("RUST_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .parse::<LogLevel>()
        .map(Into::into)
        .unwrap_or(Level::INFO);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    let log_file = env::var("STATUSFS_LOG_FILE").ok().map(PathBuf::from);

    let mut layers = vec![fmt_layer(format, io::stdout, true)];
    if let Some(file_path) = log_file {
        // Rolled daily next to the requested path
        let file_appender = tracing_appender::rolling::daily(
            file_path.parent().unwrap_or(Path::new(".")),
            file_path.file_name().unwrap_or_default(),
        );
        layers.push(fmt_layer(format, non_blocking(file_appender), false));
    }
    install(env_filter, layers)
}

/// Initialize logging with explicit level and format
///
/// ## Example
///
/// ```rust,no_run
/// use statusfs_utils::{LogFormat, LogLevel, init_logging_with_level};
///
/// init_logging_with_level(LogLevel::Debug, LogFormat::Pretty)
///     .expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Returns an error if logging is already initialized.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LogReloadHandle, LoggingError>
{
    let env_filter = EnvFilter::new(Level::from(level).to_string());
    install(env_filter, vec![fmt_layer(format, io::stdout, true)])
}

/// Initialize file-only logging for interactive sessions
///
/// Interactive sessions own stdout, so log lines go to
/// `~/.statusfs/YYYY-MM-DD-statusfs.log` (or `/tmp/YYYY-MM-DD-statusfs.log`
/// when `HOME` is unset) instead.
///
/// ## Arguments
///
/// * `level` - Optional log level. If `None`, uses `RUST_LOG` environment variable or defaults to `INFO`.
///
/// ## Errors
///
/// Returns an error if logging is already initialized or the log directory cannot be created.
pub fn init_logging_to_file(level: Option<LogLevel>) -> Result<(PathBuf, LogReloadHandle), LoggingError>
{
    // Determine log file path with date prefix
    let today = Utc::now().format("%Y-%m-%d");
    let log_file = if let Ok(home) = env::var("HOME") {
        let dir = PathBuf::from(home).join(".statusfs");
        std::fs::create_dir_all(&dir).map_err(LoggingError::FileError)?;
        dir.join(format!("{today}-statusfs.log"))
    } else {
        PathBuf::from("/tmp").join(format!("{today}-statusfs.log"))
    };

    // Priority:
    // 1. Explicit level from the CLI
    // 2. RUST_LOG (allows module-specific filters like "statusfs_core=debug")
    // 3. INFO
    let env_filter = if let Some(level) = level {
        EnvFilter::new(Level::from(level).to_string())
    } else if let Ok(rust_log) = env::var("RUST_LOG") {
        EnvFilter::try_new(&rust_log).unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()))
    } else {
        EnvFilter::new(Level::INFO.to_string())
    };

    // Use rolling::never() since we're already including the date in the filename
    let file_appender = tracing_appender::rolling::never(
        log_file.parent().unwrap_or(Path::new(".")),
        log_file.file_name().unwrap_or_default(),
    );
    let handle = install(env_filter, vec![fmt_layer(LogFormat::Pretty, non_blocking(file_appender), false)])?;
    Ok((log_file, handle))
}

fn non_blocking(appender: tracing_appender::rolling::RollingFileAppender) -> tracing_appender::non_blocking::NonBlocking
{
    let (writer, guard) = tracing_appender::non_blocking(appender);
    // Logging lives until process exit; dropping the guard would stop the writer thread.
    std::mem::forget(guard);
    writer
}

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);

    match format {
        LogFormat::Pretty => layer.with_ansi(ansi).boxed(),
        LogFormat::Json => layer.json().with_current_span(true).with_span_list(true).boxed(),
    }
}

fn install(filter: EnvFilter, layers: Vec<BoxedLayer>) -> Result<LogReloadHandle, LoggingError>
{
    let (filter, handle) = reload::Layer::new(filter);
    Registry::default()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;
    Ok(LogReloadHandle { handle })
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// Failed to swap the level filter
    #[error("Failed to reload log filter: {0}")]
    ReloadFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}
