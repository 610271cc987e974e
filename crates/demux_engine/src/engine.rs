//! Stream Demultiplexer - the per-record pass loop

use std::collections::BTreeMap;
use std::io::Read;

use contracts::{DemuxError, RouteTable};
use dispatcher::OutputSinks;
use ingestion::{RecordDecoder, StagingBuffer};
use observability::PayloadStats;
use tracing::{debug, info, instrument, warn};

use crate::report::{PassEnd, PassReport};
use crate::state::PassState;

/// Routes records of one stream to output sinks
#[derive(Debug, Clone, Copy)]
pub struct Demultiplexer<'t> {
    table: &'t RouteTable,
    staging_capacity: usize,
}

impl<'t> Demultiplexer<'t> {
    pub fn new(table: &'t RouteTable, staging_capacity: usize) -> Self {
        Self {
            table,
            staging_capacity,
        }
    }

    pub fn table(&self) -> &'t RouteTable {
        self.table
    }

    /// Run one pass over `reader`
    ///
    /// With `stop_sequence` set (recovery), the pass ends at the first record
    /// carrying that sequence number and treats it as terminal; running out
    /// of input before reaching it is `CheckpointNotReached`.
    ///
    /// # Errors
    /// Every corruption and output failure aborts the pass. Sequence gaps and
    /// regressions do not; they are counted in the report.
    #[instrument(name = "demux_run_pass", skip(self, reader, sinks))]
    pub fn run_pass<R: Read>(
        &self,
        reader: R,
        size_hint: Option<u64>,
        sinks: &mut OutputSinks,
        stop_sequence: Option<u32>,
    ) -> Result<PassReport, DemuxError> {
        let mut decoder = RecordDecoder::with_size_hint(reader, size_hint);
        let mut state = PassState::default();
        let mut staging = StagingBuffer::new(self.staging_capacity);
        let mut tally = Tally::default();
        let route_count = self.table.route_count();

        let end = loop {
            let offset = decoder.position();
            let Some(kind) = decoder.next_entry_kind()? else {
                break self.end_of_input(&state, stop_sequence)?;
            };
            if state.observed_terminal {
                return Err(DemuxError::DataAfterTerminal {
                    entry_kind: kind,
                    offset,
                });
            }
            let header = decoder.finish_header(kind)?;
            let seq = header.sequence_number;

            let check = state.check_sequence(seq);
            if check.regressed {
                tally.regressions += 1;
                observability::record_sequence_regression();
                warn!(
                    seq,
                    previous = ?state.previous.as_ref().map(|p| p.sequence_number),
                    offset,
                    "sequence number regressed"
                );
            }
            if check.gap {
                tally.gaps += 1;
                observability::record_sequence_gap();
                match &state.previous {
                    Some(prev) => warn!(
                        expected = check.expected,
                        observed = seq,
                        offset,
                        prev_kind = prev.kind,
                        prev_len = prev.length,
                        prev_sample = %prev.sample_hex(),
                        "missing sequence number, resynchronizing"
                    ),
                    None => warn!(
                        expected = check.expected,
                        observed = seq,
                        offset,
                        "stream does not start at sequence 0, resynchronizing"
                    ),
                }
            }

            if kind as usize >= route_count {
                return Err(DemuxError::InvalidEntryKind {
                    entry_kind: kind,
                    route_count,
                    offset,
                });
            }

            let grows_before = staging.grow_count();
            decoder.read_payload(&header, &mut staging)?;
            if staging.grow_count() != grows_before {
                observability::record_staging_grow(staging.capacity());
            }
            let payload = staging.staged(header.length as usize);

            debug!(kind, seq, ts = header.timestamp, len = header.length, "routing record");
            sinks.write(kind, payload)?;
            observability::record_routed(kind, payload.len());
            tally.record(kind, payload.len());

            if self.table.is_checkpoint(kind) {
                state.last_checkpoint_sequence = Some(seq);
            }
            if self.table.is_terminal(kind) {
                debug!(seq, offset, "terminal marker observed");
                state.observed_terminal = true;
            }

            state.accept(&header, payload);

            if stop_sequence == Some(seq) {
                info!(seq, "recovery stop sequence reached");
                state.observed_terminal = true;
                break PassEnd::StoppedAtCheckpoint;
            }
        };

        let report = PassReport {
            end,
            records: tally.records,
            payload_bytes: tally.payload_bytes,
            bytes_consumed: decoder.position(),
            records_per_kind: tally.per_kind,
            gaps: tally.gaps,
            regressions: tally.regressions,
            last_sequence: state.previous.as_ref().map(|p| p.sequence_number),
            last_checkpoint_sequence: state.last_checkpoint_sequence,
            stop_sequence,
            staging_capacity: staging.capacity(),
            staging_grows: staging.grow_count(),
            payload_stats: tally.payload_stats,
        };
        info!(
            end = report.end.as_str(),
            records = report.records,
            gaps = report.gaps,
            regressions = report.regressions,
            checkpoint = ?report.last_checkpoint_sequence,
            "pass finished"
        );
        Ok(report)
    }

    fn end_of_input(
        &self,
        state: &PassState,
        stop_sequence: Option<u32>,
    ) -> Result<PassEnd, DemuxError> {
        match (state.observed_terminal, stop_sequence) {
            (true, _) => Ok(PassEnd::Terminated),
            (false, None) => {
                warn!(
                    checkpoint = ?state.last_checkpoint_sequence,
                    "input ended without terminal marker"
                );
                Ok(PassEnd::Incomplete)
            }
            (false, Some(stop_sequence)) => {
                Err(DemuxError::CheckpointNotReached { stop_sequence })
            }
        }
    }
}

/// Running counters for the report
#[derive(Default)]
struct Tally {
    records: u64,
    payload_bytes: u64,
    per_kind: BTreeMap<u32, u64>,
    gaps: u64,
    regressions: u64,
    payload_stats: PayloadStats,
}

impl Tally {
    fn record(&mut self, kind: u32, len: usize) {
        self.records += 1;
        self.payload_bytes += len as u64;
        *self.per_kind.entry(kind).or_insert(0) += 1;
        self.payload_stats.update(kind, len);
    }
}
