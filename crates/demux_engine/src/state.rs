//! Per-pass mutable state

use std::fmt::Write as _;

use contracts::{EntryKind, RecordHeader};

/// Bytes of the previous payload kept for gap diagnostics
const SAMPLE_LEN: usize = 16;

/// Last accepted record, logged when the next one is out of sequence
#[derive(Debug, Default)]
pub(crate) struct PreviousRecord {
    pub kind: EntryKind,
    pub sequence_number: u32,
    pub length: u32,
    sample: Vec<u8>,
}

impl PreviousRecord {
    fn capture(&mut self, header: &RecordHeader, payload: &[u8]) {
        self.kind = header.entry_kind;
        self.sequence_number = header.sequence_number;
        self.length = header.length;
        self.sample.clear();
        self.sample
            .extend_from_slice(&payload[..payload.len().min(SAMPLE_LEN)]);
    }

    /// Hex dump of the leading payload bytes
    pub fn sample_hex(&self) -> String {
        let mut out = String::with_capacity(self.sample.len() * 2);
        for byte in &self.sample {
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

/// Outcome of the sequence check for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SequenceCheck {
    pub regressed: bool,
    pub gap: bool,
    pub expected: u32,
}

/// Created fresh for every pass and dropped at its end
///
/// The staging buffer lives beside it in the pass loop so a staged payload
/// can be borrowed while the state is updated.
#[derive(Debug, Default)]
pub(crate) struct PassState {
    pub expected_sequence: u32,
    pub observed_terminal: bool,
    pub gap_detected: bool,
    pub last_checkpoint_sequence: Option<u32>,
    pub previous: Option<PreviousRecord>,
}

impl PassState {
    /// Compare against the previous and expected sequence numbers
    ///
    /// A mismatch resynchronizes the expected counter to `sequence_number`.
    pub fn check_sequence(&mut self, sequence_number: u32) -> SequenceCheck {
        let regressed = self
            .previous
            .as_ref()
            .is_some_and(|prev| sequence_number < prev.sequence_number);
        let expected = self.expected_sequence;
        let gap = sequence_number != expected;
        if gap {
            self.gap_detected = true;
            self.expected_sequence = sequence_number;
        }
        SequenceCheck {
            regressed,
            gap,
            expected,
        }
    }

    /// Remember the accepted record and advance the counter
    pub fn accept(&mut self, header: &RecordHeader, payload: &[u8]) {
        self.previous
            .get_or_insert_with(PreviousRecord::default)
            .capture(header, payload);
        self.expected_sequence = self.expected_sequence.wrapping_add(1);
    }
}
