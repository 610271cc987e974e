//! SinkHandle - one output target plus its metrics

use contracts::{DemuxError, OutputSink, WriteDiscipline};
use tracing::error;

use crate::metrics::SinkMetrics;

/// Handle to an output sink
pub struct SinkHandle {
    sink: Box<dyn OutputSink>,
    metrics: SinkMetrics,
}

impl SinkHandle {
    pub fn new(sink: Box<dyn OutputSink>) -> Self {
        Self {
            sink,
            metrics: SinkMetrics::new(),
        }
    }

    /// Get target name
    pub fn target(&self) -> &str {
        self.sink.target()
    }

    pub fn discipline(&self) -> WriteDiscipline {
        self.sink.discipline()
    }

    /// Get current metrics
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Write one payload, counting the outcome
    pub fn write(&mut self, payload: &[u8]) -> Result<(), DemuxError> {
        match self.sink.write(payload) {
            Ok(()) => {
                self.metrics.record_write(payload.len());
                Ok(())
            }
            Err(e) => {
                self.metrics.inc_failure_count();
                error!(target = %self.sink.target(), error = %e, "write failed");
                Err(e)
            }
        }
    }

    /// Flush and close the sink
    pub fn close(&mut self) -> Result<(), DemuxError> {
        self.sink.flush()?;
        self.sink.close()
    }
}
