//! The logging facade used by service code.
//!
//! [`Logger`] builds a [`LogRecord`] per call, stamps it with the service
//! name, call site and (for `ERROR` and `FATAL`) a stacktrace, then hands it
//! to its [`Core`]. Write failures stop here: they are reported through
//! `tracing` and never reach the caller.

use std::backtrace::Backtrace;
use std::error::Error;

use oq_config::LoggingConfig;
use tracing::warn;

use crate::encoder::JsonEncoder;
use crate::error::{LogError, Result};
use crate::file_sink::{RotatingSink, RotationPolicy};
use crate::level::{LevelFilter, LogLevel};
use crate::pipeline::Core;
use crate::traits::LogSink;
use crate::types::{Caller, LogContext, LogRecord};

/// Exit status used by [`Logger::fatal`].
pub const FATAL_EXIT_CODE: i32 = 1;

/// Structured logger bound to one service name.
#[derive(Debug)]
pub struct Logger {
    service: String,
    /// `None` for a disabled logger.
    core: Option<Core>,
}

impl Logger {
    /// Builds a logger writing to the rotating file described by `config`.
    ///
    /// The logger is not installed globally; see [`crate::init`].
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidLevel`] if the level name is not recognized
    /// and [`LogError::InvalidConfig`] if the service name is empty or the
    /// section is invalid.
    pub fn new(config: &LoggingConfig, service: impl Into<String>) -> Result<Self> {
        let filter = LevelFilter::parse(&config.level)?;
        config
            .validate()
            .map_err(|e| LogError::InvalidConfig(e.to_string()))?;
        let sink = RotatingSink::new(RotationPolicy::from_config(config));
        Self::with_sink(service, filter, sink)
    }

    /// Builds a logger over an arbitrary sink.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidConfig`] if the service name is empty.
    pub fn with_sink(
        service: impl Into<String>,
        filter: LevelFilter,
        sink: impl LogSink + 'static,
    ) -> Result<Self> {
        let service = service.into();
        if service.trim().is_empty() {
            return Err(LogError::InvalidConfig(
                "service name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            service,
            core: Some(Core::new(filter, JsonEncoder::new(), sink)),
        })
    }

    /// A logger that drops every record.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            service: String::new(),
            core: None,
        }
    }

    /// Name of the service stamped on every record.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns true if records at `level` would be written.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.core.as_ref().is_some_and(|core| core.enabled(level))
    }

    /// Logs at `DEBUG`.
    #[track_caller]
    pub fn debug(&self, message: &str, error: Option<&dyn Error>, context: LogContext) {
        self.log(LogLevel::Debug, message, error, context, "");
    }

    /// Logs at `INFO`.
    #[track_caller]
    pub fn info(&self, message: &str, error: Option<&dyn Error>, context: LogContext) {
        self.log(LogLevel::Info, message, error, context, "");
    }

    /// Logs at `WARN`.
    #[track_caller]
    pub fn warning(&self, message: &str, error: Option<&dyn Error>, context: LogContext) {
        self.log(LogLevel::Warning, message, error, context, "");
    }

    /// Logs at `ERROR` with a stacktrace and the caller's trace id.
    #[track_caller]
    pub fn error(
        &self,
        message: &str,
        error: Option<&dyn Error>,
        context: LogContext,
        trace_id: &str,
    ) {
        self.log(LogLevel::Error, message, error, context, trace_id);
    }

    /// Logs at `FATAL`, then terminates the process.
    ///
    /// The record is written and the sink flushed on a best-effort basis,
    /// after which the process exits with status [`FATAL_EXIT_CODE`]. Other
    /// threads are not given a chance to finish their writes. Reserve this
    /// for unrecoverable startup or invariant failures.
    #[track_caller]
    pub fn fatal(
        &self,
        message: &str,
        error: Option<&dyn Error>,
        context: LogContext,
        trace_id: &str,
    ) -> ! {
        self.log(LogLevel::Fatal, message, error, context, trace_id);
        if let Some(core) = &self.core {
            if let Err(e) = core.flush() {
                warn!(error = %e, service = %self.service, "failed to flush log before exit");
            }
        }
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Builds and emits a record at any level.
    ///
    /// Unlike [`Logger::fatal`], a `FATAL` record written here does not exit.
    #[track_caller]
    pub fn log(
        &self,
        level: LogLevel,
        message: &str,
        error: Option<&dyn Error>,
        context: LogContext,
        trace_id: &str,
    ) {
        let Some(core) = &self.core else {
            return;
        };
        if !core.enabled(level) {
            return;
        }

        let mut record = LogRecord::new(level, message, Caller::capture())
            .with_service(self.service.as_str())
            .with_error(error)
            .with_trace_id(trace_id)
            .with_context(context);
        if level.captures_stacktrace() {
            record = record.with_stacktrace(Backtrace::force_capture().to_string());
        }

        if let Err(e) = core.emit(&record) {
            warn!(
                error = %e,
                service = %self.service,
                severity = %level,
                "failed to write log record"
            );
        }
    }
}
