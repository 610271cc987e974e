//! AppendSink - one handle held open for the whole pass

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use contracts::{DemuxError, OutputSink, SinkOp, WriteDiscipline};
use tracing::{debug, instrument};

/// Concatenates every payload onto a file truncated when the sink opens
pub struct AppendSink {
    target: String,
    writer: Option<BufWriter<File>>,
}

impl AppendSink {
    /// Create (or truncate) `root/target` and keep it open
    pub fn open(root: &Path, target: impl Into<String>) -> Result<Self, DemuxError> {
        let target = target.into();
        let path = root.join(&target);
        let file =
            File::create(&path).map_err(|e| DemuxError::sink(&target, SinkOp::Open, e))?;
        debug!(target = %target, path = %path.display(), "append target opened");

        Ok(Self {
            target,
            writer: Some(BufWriter::new(file)),
        })
    }

    fn writer(&mut self, op: SinkOp) -> Result<&mut BufWriter<File>, DemuxError> {
        let target = &self.target;
        self.writer.as_mut().ok_or_else(|| {
            DemuxError::sink(
                target.as_str(),
                op,
                std::io::Error::other("target already closed"),
            )
        })
    }
}

impl OutputSink for AppendSink {
    fn target(&self) -> &str {
        &self.target
    }

    fn discipline(&self) -> WriteDiscipline {
        WriteDiscipline::Append
    }

    #[instrument(
        name = "append_sink_write",
        level = "trace",
        skip(self, payload),
        fields(target = %self.target, len = payload.len())
    )]
    fn write(&mut self, payload: &[u8]) -> Result<(), DemuxError> {
        let target = self.target.clone();
        self.writer(SinkOp::Write)?
            .write_all(payload)
            .map_err(|e| DemuxError::sink(target, SinkOp::Write, e))
    }

    fn flush(&mut self) -> Result<(), DemuxError> {
        let target = self.target.clone();
        self.writer(SinkOp::Flush)?
            .flush()
            .map_err(|e| DemuxError::sink(target, SinkOp::Flush, e))
    }

    #[instrument(name = "append_sink_close", skip(self), fields(target = %self.target))]
    fn close(&mut self) -> Result<(), DemuxError> {
        if let Some(writer) = self.writer.take() {
            writer
                .into_inner()
                .map_err(|e| DemuxError::sink(&self.target, SinkOp::Close, e.into_error()))?;
            debug!(target = %self.target, "append target closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn concatenates_payloads() {
        let dir = tempdir().unwrap();
        let mut sink = AppendSink::open(dir.path(), "recording.tmcpr").unwrap();
        sink.write(b"ab").unwrap();
        sink.write(b"").unwrap();
        sink.write(b"cd").unwrap();
        sink.close().unwrap();

        assert_eq!(std::fs::read(dir.path().join("recording.tmcpr")).unwrap(), b"abcd");
    }

    #[test]
    fn open_truncates_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("actions.tmcpr");
        std::fs::write(&path, b"stale").unwrap();

        let mut sink = AppendSink::open(dir.path(), "actions.tmcpr").unwrap();
        sink.write(b"new").unwrap();
        sink.close().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn write_after_close_fails() {
        let dir = tempdir().unwrap();
        let mut sink = AppendSink::open(dir.path(), "x.bin").unwrap();
        sink.close().unwrap();
        sink.close().unwrap();
        let err = sink.write(b"late").unwrap_err();
        assert!(err.to_string().contains("x.bin"));
    }

    #[test]
    fn open_in_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = AppendSink::open(&missing, "x.bin").err().unwrap();
        assert!(matches!(err, DemuxError::Sink { op: SinkOp::Open, .. }));
    }
}
