//! Pass and run reports

use std::collections::BTreeMap;

use contracts::{EntryKind, StreamStatus};
use observability::PayloadStats;
use serde::Serialize;

/// How a pass ended without a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassEnd {
    /// Terminal marker seen, input ended cleanly after it
    Terminated,
    /// Recovery stop sequence reached; terminal forced
    StoppedAtCheckpoint,
    /// Input ended without a terminal marker
    Incomplete,
}

impl PassEnd {
    /// Metric label
    pub fn as_str(&self) -> &'static str {
        match self {
            PassEnd::Terminated => "terminated",
            PassEnd::StoppedAtCheckpoint => "stopped_at_checkpoint",
            PassEnd::Incomplete => "incomplete",
        }
    }
}

/// Summary of one pass over the stream
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub end: PassEnd,
    /// Records accepted and routed
    pub records: u64,
    pub payload_bytes: u64,
    /// Input bytes consumed when the pass ended
    pub bytes_consumed: u64,
    pub records_per_kind: BTreeMap<EntryKind, u64>,
    /// Sequence mismatches (each one resynchronized)
    pub gaps: u64,
    pub regressions: u64,
    pub last_sequence: Option<u32>,
    pub last_checkpoint_sequence: Option<u32>,
    /// Stop sequence of a recovery pass
    pub stop_sequence: Option<u32>,
    pub staging_capacity: usize,
    pub staging_grows: u64,
    #[serde(skip)]
    pub payload_stats: PayloadStats,
}

impl PassReport {
    /// Terminal observed, either read from the stream or forced at the stop point
    pub fn observed_terminal(&self) -> bool {
        matches!(self.end, PassEnd::Terminated | PassEnd::StoppedAtCheckpoint)
    }

    pub fn gap_detected(&self) -> bool {
        self.gaps > 0
    }

    /// Status artifact content for this pass
    pub fn status(&self) -> StreamStatus {
        StreamStatus::new(self.observed_terminal(), self.gap_detected())
    }
}

/// Collaborator-facing outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    RecoveredSuccess,
}

/// Result of a full run (first pass plus optional recovery)
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub first_pass: PassReport,
    pub recovery_pass: Option<PassReport>,
}

impl RunReport {
    /// The pass whose output is on disk
    pub fn final_pass(&self) -> &PassReport {
        self.recovery_pass.as_ref().unwrap_or(&self.first_pass)
    }

    /// Status of the final pass
    pub fn status(&self) -> StreamStatus {
        self.final_pass().status()
    }
}
