//! # statusfs Utilities
//!
//! Shared utilities, logging, and helpers for statusfs.
//!
//! This crate provides common functionality used across the statusfs workspace,
//! including logging infrastructure built on `tracing` whose level can be
//! changed while the program runs.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{
    init_logging, init_logging_to_file, init_logging_with_level, LogFormat, LogLevel, LogReloadHandle, LoggingError,
};
pub use tracing::{debug, error, info, trace, warn};
