//! StreamEncoder - produces framed recording streams
//!
//! Used for fixtures and tests. Allows deliberately malformed output via
//! [`StreamEncoder::header`] and [`StreamEncoder::raw`].

use bytes::{BufMut, Bytes, BytesMut};
use contracts::{EntryKind, RecordHeader};

/// Builder for a framed byte stream
#[derive(Debug, Default)]
pub struct StreamEncoder {
    buf: BytesMut,
    next_sequence: u32,
}

impl StreamEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a complete record with an explicit sequence number
    ///
    /// The automatic counter used by [`push`](Self::push) continues from
    /// `sequence_number + 1`.
    pub fn record(
        &mut self,
        entry_kind: EntryKind,
        sequence_number: u32,
        timestamp: u32,
        payload: &[u8],
    ) -> &mut Self {
        self.header(entry_kind, sequence_number, timestamp, payload.len() as u32);
        self.buf.put_slice(payload);
        self.next_sequence = sequence_number.wrapping_add(1);
        self
    }

    /// Append a record numbered by the automatic counter
    pub fn push(&mut self, entry_kind: EntryKind, payload: &[u8]) -> &mut Self {
        let seq = self.next_sequence;
        self.record(entry_kind, seq, 0, payload)
    }

    /// Append only a header; `length` need not match what follows
    pub fn header(
        &mut self,
        entry_kind: EntryKind,
        sequence_number: u32,
        timestamp: u32,
        length: u32,
    ) -> &mut Self {
        self.buf.reserve(RecordHeader::ENCODED_LEN);
        self.buf.put_u32(entry_kind);
        self.buf.put_u32(sequence_number);
        self.buf.put_u32(timestamp);
        self.buf.put_u32(length);
        self
    }

    /// Append arbitrary bytes
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.put_slice(bytes);
        self
    }

    /// Encoded length so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_two_record_layout() {
        let mut enc = StreamEncoder::new();
        enc.record(2, 0, 0, b"abc").record(12, 1, 0, b"");
        let bytes = enc.finish();

        let expected: Vec<u8> = [
            &[0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3][..],
            b"abc",
            &[0, 0, 0, 12, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0][..],
        ]
        .concat();
        assert_eq!(&bytes[..], &expected[..]);
    }

    #[test]
    fn push_continues_sequence() {
        let mut enc = StreamEncoder::new();
        enc.record(1, 10, 0, b"m").push(2, b"a");
        let bytes = enc.finish();
        // second header starts at 17, sequence field at 21
        assert_eq!(&bytes[21..25], &11u32.to_be_bytes());
    }
}
