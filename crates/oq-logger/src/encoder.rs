//! JSON-lines encoding of [`LogRecord`]s.
//!
//! Each record becomes one JSON object terminated by `\n`. Keys appear in a
//! fixed order:
//!
//! | key          | value                                         |
//! |--------------|-----------------------------------------------|
//! | `level`      | `DEBUG`, `INFO`, `WARN`, `ERROR`, `FATAL`      |
//! | `timestamp`  | ISO-8601 UTC with milliseconds, `Z` suffix     |
//! | `caller`     | `dir/file.rs:line`                             |
//! | `message`    | text                                           |
//! | `service`    | service name                                   |
//! | `error`      | rendered error, omitted when absent            |
//! | `trace_id`   | text, possibly empty                           |
//! | `context`    | object                                         |
//! | `stacktrace` | text, only at `ERROR` and `FATAL`              |
//!
//! This layout is read by downstream tooling and must stay stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::level::LogLevel;
use crate::types::{LogContext, LogRecord};

/// Timestamp layout: `2024-05-01T12:30:45.123Z`. Records are always stamped in UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Borrowed view of a record in wire order.
#[derive(Serialize)]
struct WireRecord<'a> {
    level: LogLevel,
    timestamp: String,
    caller: String,
    message: &'a str,
    service: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    trace_id: &'a str,
    context: &'a LogContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    stacktrace: Option<&'a str>,
}

/// A record as read back from a log file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecodedRecord {
    /// Severity level
    pub level: LogLevel,
    /// Timestamp text as written
    pub timestamp: String,
    /// Short caller location
    pub caller: String,
    /// The log message
    pub message: String,
    /// Service name
    pub service: String,
    /// Rendered error, if any
    #[serde(default)]
    pub error: Option<String>,
    /// Trace id
    #[serde(default)]
    pub trace_id: String,
    /// Context map
    #[serde(default)]
    pub context: LogContext,
    /// Stacktrace, if any
    #[serde(default)]
    pub stacktrace: Option<String>,
}

impl DecodedRecord {
    /// Parses the timestamp field.
    #[must_use]
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Serializes records into newline-delimited JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl JsonEncoder {
    /// Creates an encoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encodes one record as a JSON object followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if a context value cannot be serialized.
    pub fn encode(&self, record: &LogRecord) -> Result<Vec<u8>> {
        let wire = WireRecord {
            level: record.level,
            timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            caller: record.caller.to_string(),
            message: &record.message,
            service: &record.service,
            error: record.error.as_deref(),
            trace_id: &record.trace_id,
            context: &record.context,
            stacktrace: record.stacktrace.as_deref(),
        };

        let mut buf = Vec::with_capacity(256);
        serde_json::to_writer(&mut buf, &wire)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Decodes one line produced by [`JsonEncoder::encode`].
    ///
    /// # Errors
    ///
    /// Returns an error if the line is not a valid record.
    pub fn decode(&self, line: &str) -> Result<DecodedRecord> {
        Ok(serde_json::from_str(line.trim_end())?)
    }
}
