//! # oq-logger
//!
//! Process-wide structured logging for the questionnaire service.
//!
//! This crate provides:
//!
//! - [`Logger`] — Leveled facade (`debug`, `info`, `warning`, `error`, `fatal`)
//! - [`init`] / [`get_logger`] / [`logger`] — The one-shot global logger
//! - [`LogLevel`] / [`LevelFilter`] — Severities and the threshold gate
//! - [`LogRecord`] / [`LogContext`] — Structured events and their metadata
//! - [`JsonEncoder`] — Newline-delimited JSON encoding
//! - [`RotatingSink`] / [`RotationPolicy`] — Size-rotated log files with
//!   backup-count, age and gzip limits
//! - [`LogSink`] — Abstract destination trait
//!
//! ## Example
//!
//! ```rust,no_run
//! use oq_config::Config;
//! use oq_logger::LogContext;
//!
//! let config = Config::from_file("config.toml")?;
//! oq_logger::init(&config, "questionnaire")?;
//!
//! oq_logger::logger().info(
//!     "user created",
//!     None,
//!     LogContext::new().with("national_id", "0012345678"),
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod encoder;
pub mod error;
pub mod file_sink;
pub mod global;
pub mod level;
pub mod logger;
pub mod pipeline;
pub mod store;
pub mod traits;
pub mod types;

// Re-export main types
pub use encoder::{DecodedRecord, JsonEncoder, TIMESTAMP_FORMAT};
pub use error::{LogError, Result};
pub use file_sink::{BackupFile, RotatingSink, RotationPolicy};
pub use global::{get_logger, init, is_initialized, logger};
pub use level::{LevelFilter, LogLevel};
pub use logger::{Logger, FATAL_EXIT_CODE};
pub use pipeline::Core;
pub use store::MemorySink;
pub use traits::LogSink;
pub use types::{Caller, LogContext, LogRecord};
