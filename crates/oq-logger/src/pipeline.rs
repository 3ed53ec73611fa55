//! The write pipeline: filter, encode, write.

use std::fmt;

use crate::encoder::JsonEncoder;
use crate::error::Result;
use crate::level::{LevelFilter, LogLevel};
use crate::traits::LogSink;
use crate::types::LogRecord;

/// Composes a [`LevelFilter`], a [`JsonEncoder`] and a [`LogSink`].
pub struct Core {
    filter: LevelFilter,
    encoder: JsonEncoder,
    sink: Box<dyn LogSink>,
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Core")
            .field("filter", &self.filter)
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}

impl Core {
    /// Assembles a core.
    #[must_use]
    pub fn new(filter: LevelFilter, encoder: JsonEncoder, sink: impl LogSink + 'static) -> Self {
        Self {
            filter,
            encoder,
            sink: Box::new(sink),
        }
    }

    /// Returns the level filter.
    #[must_use]
    pub const fn filter(&self) -> LevelFilter {
        self.filter
    }

    /// Returns true if records at `level` would be written.
    #[inline]
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.filter.admits(level)
    }

    /// Writes a record if the filter admits it.
    ///
    /// A rejected record is neither encoded nor written. There are no retries.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the sink write fails.
    pub fn emit(&self, record: &LogRecord) -> Result<()> {
        if !self.filter.admits(record.level) {
            return Ok(());
        }
        let bytes = self.encoder.encode(record)?;
        self.sink.write_record(&bytes)
    }

    /// Flushes the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be flushed.
    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }
}
