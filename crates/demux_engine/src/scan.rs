//! Diagnostic scan: a full pass with every route discarded

use contracts::{DemuxError, RouteTable, StreamSource};
use dispatcher::OutputSinks;
use serde::Serialize;
use tracing::instrument;

use crate::engine::Demultiplexer;
use crate::report::{PassEnd, PassReport};

/// What a real run would do with the scanned stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanVerdict {
    /// Terminal marker present
    Complete,
    /// Incomplete, replay would stop at this checkpoint
    Recoverable { stop_sequence: u32 },
    /// Incomplete and no checkpoint to stop at
    Unrecoverable,
}

/// Scan result
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub verdict: ScanVerdict,
    pub pass: PassReport,
}

/// Decode and sequence-check `source` without writing any output
#[instrument(name = "demux_scan", skip(table, source), fields(input = %source.name()))]
pub fn scan(
    table: &RouteTable,
    staging_capacity: usize,
    source: &mut dyn StreamSource,
) -> Result<ScanReport, DemuxError> {
    let name = source.name().to_string();
    let size_hint = source.size_hint();
    let reader = source.open().map_err(|e| DemuxError::input_open(name, e))?;

    let mut sinks = OutputSinks::discarding(table);
    let demux = Demultiplexer::new(table, staging_capacity);
    let pass = demux.run_pass(reader, size_hint, &mut sinks, None)?;

    let verdict = match (pass.end, pass.last_checkpoint_sequence) {
        (PassEnd::Incomplete, Some(stop_sequence)) => ScanVerdict::Recoverable { stop_sequence },
        (PassEnd::Incomplete, None) => ScanVerdict::Unrecoverable,
        _ => ScanVerdict::Complete,
    };
    Ok(ScanReport { verdict, pass })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::StreamLayout;
    use ingestion::{MemorySource, StreamEncoder};

    #[test]
    fn reports_recoverable_stream() {
        let table = StreamLayout::pipeline().to_route_table().unwrap();
        let mut enc = StreamEncoder::new();
        enc.push(1, b"{}").push(2, &[0u8; 32]).push(14, b"act");
        let mut source = MemorySource::new("mem", enc.finish());

        let report = scan(&table, 16, &mut source).unwrap();
        assert_eq!(report.verdict, ScanVerdict::Recoverable { stop_sequence: 0 });
        assert_eq!(report.pass.records, 3);
        assert_eq!(report.pass.staging_grows, 1);
        assert_eq!(report.pass.payload_stats.summary().per_kind[&2].max, 32.0);
    }

    #[test]
    fn complete_and_unrecoverable() {
        let table = StreamLayout::legacy().to_route_table().unwrap();

        let mut enc = StreamEncoder::new();
        enc.push(2, b"abc").push(12, b"");
        let mut complete = MemorySource::new("complete", enc.finish());
        assert_eq!(
            scan(&table, 16, &mut complete).unwrap().verdict,
            ScanVerdict::Complete
        );

        let mut enc = StreamEncoder::new();
        enc.push(2, b"abc");
        let mut partial = MemorySource::new("partial", enc.finish());
        assert_eq!(
            scan(&table, 16, &mut partial).unwrap().verdict,
            ScanVerdict::Unrecoverable
        );
    }
}
