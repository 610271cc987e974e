//! DiscardSink - the reserved null target

use contracts::{DemuxError, OutputSink, WriteDiscipline};
use tracing::trace;

/// Accepts and drops every payload
pub struct DiscardSink {
    name: String,
}

impl DiscardSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for DiscardSink {
    fn default() -> Self {
        Self::new("<discard>")
    }
}

impl OutputSink for DiscardSink {
    fn target(&self) -> &str {
        &self.name
    }

    fn discipline(&self) -> WriteDiscipline {
        WriteDiscipline::Discard
    }

    fn write(&mut self, payload: &[u8]) -> Result<(), DemuxError> {
        trace!(target = %self.name, len = payload.len(), "payload discarded");
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DemuxError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), DemuxError> {
        Ok(())
    }
}
