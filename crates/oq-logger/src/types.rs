//! Core types for structured records.
//!
//! This module provides:
//! - [`LogContext`] — Caller-supplied key/value metadata
//! - [`Caller`] — Source location of the call site
//! - [`LogRecord`] — One structured logging event

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::Location;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::LogLevel;

/// Arbitrary structured metadata attached to a record.
///
/// Keys are unique. Entries are kept sorted so that encoding is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogContext(BTreeMap<String, serde_json::Value>);

impl LogContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a key, returning the previous value if present.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Looks up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }
}

impl From<HashMap<String, serde_json::Value>> for LogContext {
    fn from(map: HashMap<String, serde_json::Value>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, serde_json::Value>> for LogContext {
    fn from(map: BTreeMap<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

impl<K, V> FromIterator<(K, V)> for LogContext
where
    K: Into<String>,
    V: Into<serde_json::Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Source location of a logging call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    file: &'static str,
    line: u32,
}

impl Caller {
    /// Creates a caller from a file path and line.
    #[must_use]
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Captures the location of the nearest `#[track_caller]` call site.
    #[track_caller]
    #[must_use]
    pub fn capture() -> Self {
        Self::from(Location::caller())
    }

    /// Full source path.
    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// Source line.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// The final directory and file name, e.g. `repo/user.rs`.
    #[must_use]
    pub fn short_file(&self) -> &'static str {
        let file = self.file;
        let Some(last) = file.rfind(['/', '\\']) else {
            return file;
        };
        match file[..last].rfind(['/', '\\']) {
            Some(prev) => &file[prev + 1..],
            None => file,
        }
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.short_file(), self.line)
    }
}

/// A structured logging event, built per call and consumed by the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// When the record was generated
    pub timestamp: DateTime<Utc>,
    /// Severity level
    pub level: LogLevel,
    /// The log message
    pub message: String,
    /// Rendered error, if one was supplied
    pub error: Option<String>,
    /// Request/operation correlation id; empty when not supplied
    pub trace_id: String,
    /// Name of the emitting service
    pub service: String,
    /// Caller-supplied metadata
    pub context: LogContext,
    /// Call site
    pub caller: Caller,
    /// Captured stack, only at Error and above
    pub stacktrace: Option<String>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    ///
    /// Remaining fields start empty.
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>, caller: Caller) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            error: None,
            trace_id: String::new(),
            service: String::new(),
            context: LogContext::default(),
            caller,
            stacktrace: None,
        }
    }

    /// Sets the timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Renders and attaches an error.
    #[must_use]
    pub fn with_error(mut self, error: Option<&dyn std::error::Error>) -> Self {
        self.error = error.map(ToString::to_string);
        self
    }

    /// Sets the trace id.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    /// Sets the service name.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Sets the context map.
    #[must_use]
    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    /// Sets the stacktrace.
    #[must_use]
    pub fn with_stacktrace(mut self, stacktrace: impl Into<String>) -> Self {
        self.stacktrace = Some(stacktrace.into());
        self
    }
}
