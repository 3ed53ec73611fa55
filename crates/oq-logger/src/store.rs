//! In-memory record sink.
//!
//! [`MemorySink`] keeps encoded records in a shared buffer. Clones share the
//! same buffer, so a test can hand one clone to a logger and inspect the other.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;
use crate::traits::LogSink;

/// Shared in-memory buffer of encoded records.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything written so far.
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    /// Returns the written records as lines (without the trailing newline).
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buf.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Number of bytes written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }

    /// Discards all written bytes.
    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn write_record(&self, record: &[u8]) -> Result<()> {
        self.buf.lock().extend_from_slice(record);
        Ok(())
    }
}
