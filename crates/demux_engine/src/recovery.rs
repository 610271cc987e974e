//! Recovery Driver
//!
//! Runs the first pass and, when it ends without a terminal marker, replays
//! the stream from byte 0 into freshly truncated outputs, stopping at the
//! last checkpoint seen by the first pass.

use std::path::PathBuf;

use contracts::{DemuxError, RouteTable, StreamConfig, StreamSource};
use dispatcher::{reset_outputs, write_status, OutputSinks};
use tracing::{info, instrument, warn};

use crate::engine::Demultiplexer;
use crate::report::{PassReport, RunOutcome, RunReport};

/// Drives a full demultiplexing run into an output root
pub struct RecoveryDriver<'t> {
    demux: Demultiplexer<'t>,
    output_root: PathBuf,
    status_file: String,
}

impl<'t> RecoveryDriver<'t> {
    pub fn new(
        table: &'t RouteTable,
        stream: &StreamConfig,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            demux: Demultiplexer::new(table, stream.staging_capacity),
            output_root: output_root.into(),
            status_file: stream.status_file.clone(),
        }
    }

    /// Demultiplex `source`, recovering once if needed
    ///
    /// The status artifact is rewritten after every completed pass.
    ///
    /// # Errors
    /// - any fatal condition of either pass
    /// - `MissingCheckpoint` when the first pass is incomplete and saw no checkpoint
    /// - `CheckpointNotReached` when the replay ends before the checkpoint
    #[instrument(
        name = "recovery_driver_run",
        skip(self, source),
        fields(input = %source.name(), root = %self.output_root.display())
    )]
    pub fn run(&self, source: &mut dyn StreamSource) -> Result<RunReport, DemuxError> {
        let first_pass = self.pass(source, None)?;
        observability::record_pass(false, first_pass.end.as_str());
        self.write_status(&first_pass)?;

        if first_pass.observed_terminal() {
            return Ok(RunReport {
                outcome: RunOutcome::Success,
                first_pass,
                recovery_pass: None,
            });
        }

        let stop_sequence = first_pass
            .last_checkpoint_sequence
            .ok_or(DemuxError::MissingCheckpoint)?;
        warn!(
            stop_sequence,
            records = first_pass.records,
            "stream incomplete, replaying up to last checkpoint"
        );
        observability::record_recovery(stop_sequence);

        reset_outputs(&self.output_root, self.demux.table())?;
        let recovery_pass = self.pass(source, Some(stop_sequence))?;
        observability::record_pass(true, recovery_pass.end.as_str());
        self.write_status(&recovery_pass)?;

        info!(
            stop_sequence,
            records = recovery_pass.records,
            "recovery complete"
        );
        Ok(RunReport {
            outcome: RunOutcome::RecoveredSuccess,
            first_pass,
            recovery_pass: Some(recovery_pass),
        })
    }

    fn pass(
        &self,
        source: &mut dyn StreamSource,
        stop_sequence: Option<u32>,
    ) -> Result<PassReport, DemuxError> {
        let name = source.name().to_string();
        let size_hint = source.size_hint();
        let reader = source.open().map_err(|e| DemuxError::input_open(name, e))?;

        let mut sinks = OutputSinks::open(&self.output_root, self.demux.table())?;
        let report = self
            .demux
            .run_pass(reader, size_hint, &mut sinks, stop_sequence)
            .inspect_err(|_| observability::record_pass(stop_sequence.is_some(), "failed"))?;
        sinks.close_all()?;
        Ok(report)
    }

    fn write_status(&self, report: &PassReport) -> Result<(), DemuxError> {
        write_status(&self.output_root, &self.status_file, report.status())?;
        Ok(())
    }
}
