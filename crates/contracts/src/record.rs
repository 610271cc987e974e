//! Record - Record Decoder output
//!
//! One framed unit of the recording stream:
//! `entry_kind:u32be | sequence_number:u32be | timestamp:u32be | length:u32be | payload`

/// Entry kind discriminator
pub type EntryKind = u32;

/// Fixed-size record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Selects the routing target
    pub entry_kind: EntryKind,

    /// Expected to equal the running record counter
    pub sequence_number: u32,

    /// Opaque, passed through unexamined
    pub timestamp: u32,

    /// Payload length in bytes
    pub length: u32,
}

impl RecordHeader {
    /// Encoded header size: four big-endian u32 fields
    pub const ENCODED_LEN: usize = 16;

    /// Total encoded size of the record (header + payload)
    pub fn frame_len(&self) -> u64 {
        Self::ENCODED_LEN as u64 + u64::from(self.length)
    }
}

/// A decoded record whose payload borrows the staging buffer
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub header: RecordHeader,
    pub payload: &'a [u8],
}

impl Record<'_> {
    pub fn entry_kind(&self) -> EntryKind {
        self.header.entry_kind
    }

    pub fn sequence_number(&self) -> u32 {
        self.header.sequence_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_len() {
        let header = RecordHeader {
            entry_kind: 2,
            sequence_number: 0,
            timestamp: 0,
            length: 3,
        };
        assert_eq!(header.frame_len(), 19);
    }
}
