//! RecordDecoder - header and payload decoding
//!
//! Headers and payloads are decoded in two steps so the caller can reject a
//! record (unknown kind, data after terminal) before its payload is read.

use std::io::Read;

use contracts::{EntryKind, Record, RecordHeader};
use tracing::trace;

use crate::error::{IngestionError, Result};
use crate::frame::FrameReader;
use crate::staging::StagingBuffer;

/// Decodes framed records from a byte stream
pub struct RecordDecoder<R> {
    frames: FrameReader<R>,
    size_hint: Option<u64>,
}

impl<R: Read> RecordDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            frames: FrameReader::new(reader),
            size_hint: None,
        }
    }

    /// Decoder that knows the total input length
    ///
    /// A payload length larger than the bytes remaining is reported as
    /// truncated before anything is allocated for it.
    pub fn with_size_hint(reader: R, size_hint: Option<u64>) -> Self {
        Self {
            frames: FrameReader::new(reader),
            size_hint,
        }
    }

    /// Byte offset of the next unread byte
    pub fn position(&self) -> u64 {
        self.frames.position()
    }

    /// Decode the leading `entry_kind` of the next record
    ///
    /// Returns `Ok(None)` when the input ends exactly on a record boundary.
    pub fn next_entry_kind(&mut self) -> Result<Option<EntryKind>> {
        self.frames.read_leading_u32("entry_kind")
    }

    /// Decode the rest of a header whose `entry_kind` was already read
    pub fn finish_header(&mut self, entry_kind: EntryKind) -> Result<RecordHeader> {
        let sequence_number = self.frames.read_u32("sequence_number")?;
        let timestamp = self.frames.read_u32("timestamp")?;
        let length = self.frames.read_u32("length")?;

        let header = RecordHeader {
            entry_kind,
            sequence_number,
            timestamp,
            length,
        };
        trace!(?header, offset = self.position(), "decoded header");
        Ok(header)
    }

    /// Decode the next header
    ///
    /// Returns `Ok(None)` when the input ends exactly on a record boundary.
    pub fn next_header(&mut self) -> Result<Option<RecordHeader>> {
        match self.next_entry_kind()? {
            Some(kind) => self.finish_header(kind).map(Some),
            None => Ok(None),
        }
    }

    /// Read the payload announced by `header` into `staging`
    ///
    /// Without a size hint, a payload larger than the staging buffer is read
    /// into a buffer that grows with the bytes received, and only handed to
    /// `staging` once complete.
    pub fn read_payload<'s>(
        &mut self,
        header: &RecordHeader,
        staging: &'s mut StagingBuffer,
    ) -> Result<&'s [u8]> {
        let len = header.length as usize;
        if let Some(total) = self.size_hint {
            let remaining = total.saturating_sub(self.position());
            if u64::from(header.length) > remaining {
                return Err(IngestionError::TruncatedPayload {
                    offset: self.position(),
                    expected: header.length,
                    available: remaining as usize,
                });
            }
        }

        if self.size_hint.is_none() && len > staging.capacity() {
            let payload = self.frames.read_payload_bounded(header.length)?;
            staging.adopt(payload);
        } else {
            let buf = staging.prepare(len);
            self.frames.read_exact_payload(buf)?;
        }
        Ok(staging.staged(len))
    }

    /// Decode header and payload together
    pub fn next_record<'s>(
        &mut self,
        staging: &'s mut StagingBuffer,
    ) -> Result<Option<Record<'s>>> {
        let Some(header) = self.next_header()? else {
            return Ok(None);
        };
        let payload = self.read_payload(&header, staging)?;
        Ok(Some(Record { header, payload }))
    }
}
