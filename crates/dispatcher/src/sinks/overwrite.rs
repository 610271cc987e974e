//! OverwriteSink - open, write, close per record

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use contracts::{DemuxError, OutputSink, SinkOp, WriteDiscipline};
use tracing::instrument;

/// Holds exactly the most recent payload routed to it
pub struct OverwriteSink {
    target: String,
    path: PathBuf,
}

impl OverwriteSink {
    /// Nothing is created until the first write
    pub fn new(root: &Path, target: impl Into<String>) -> Self {
        let target = target.into();
        let path = root.join(&target);
        Self { target, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for OverwriteSink {
    fn target(&self) -> &str {
        &self.target
    }

    fn discipline(&self) -> WriteDiscipline {
        WriteDiscipline::Overwrite
    }

    #[instrument(
        name = "overwrite_sink_write",
        level = "trace",
        skip(self, payload),
        fields(target = %self.target, len = payload.len())
    )]
    fn write(&mut self, payload: &[u8]) -> Result<(), DemuxError> {
        let mut file = File::create(&self.path)
            .map_err(|e| DemuxError::sink(&self.target, SinkOp::Open, e))?;
        file.write_all(payload)
            .map_err(|e| DemuxError::sink(&self.target, SinkOp::Write, e))?;
        file.flush()
            .map_err(|e| DemuxError::sink(&self.target, SinkOp::Close, e))
    }

    fn flush(&mut self) -> Result<(), DemuxError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), DemuxError> {
        Ok(())
    }
}
