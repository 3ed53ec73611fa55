//! Traits for record destinations.
//!
//! This module provides the [`LogSink`] trait, the seam between the
//! [`Core`](crate::pipeline::Core) write pipeline and the durable destination
//! (a rotating file in production, a memory buffer in tests).

use crate::error::Result;

/// A destination for encoded records.
///
/// Implementors must write each record atomically: concurrent calls may be
/// reordered but never interleaved.
pub trait LogSink: Send + Sync {
    /// Writes one complete encoded record.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot accept the bytes.
    fn write_record(&self, record: &[u8]) -> Result<()>;

    /// Flushes buffered data to the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

impl<T: LogSink + ?Sized> LogSink for std::sync::Arc<T> {
    fn write_record(&self, record: &[u8]) -> Result<()> {
        (**self).write_record(record)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}
