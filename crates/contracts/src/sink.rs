//! OutputSink trait - Output Sink Manager target interface
//!
//! Defines the abstract interface for one output target.

use crate::{DemuxError, WriteDiscipline};

/// One output target
///
/// All sink implementations must implement this trait. Writes are blocking.
pub trait OutputSink {
    /// Target name (used for logging/metrics)
    fn target(&self) -> &str;

    /// Write discipline this sink implements
    fn discipline(&self) -> WriteDiscipline;

    /// Write one record payload
    ///
    /// # Errors
    /// Returns open/write error (should include target name)
    fn write(&mut self, payload: &[u8]) -> Result<(), DemuxError>;

    /// Flush buffer (if any)
    fn flush(&mut self) -> Result<(), DemuxError>;

    /// Close sink; no writes may follow
    fn close(&mut self) -> Result<(), DemuxError>;
}
