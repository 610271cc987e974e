//! Big-endian field reader with byte-offset tracking

use std::io::{ErrorKind, Read};

use crate::error::{IngestionError, Result};

/// Initial reservation for payloads read without a known input size
const PAYLOAD_CHUNK: usize = 64 * 1024;

/// Wraps a reader and counts consumed bytes
pub struct FrameReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read until `buf` is full or the input ends; returns bytes read
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(IngestionError::Io(e)),
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }

    /// Read the first field of a record
    ///
    /// Zero bytes left is a clean end of input (`None`); one to three bytes
    /// is a truncated frame.
    pub fn read_leading_u32(&mut self, field: &'static str) -> Result<Option<u32>> {
        let offset = self.position;
        let mut word = [0u8; 4];
        match self.fill(&mut word)? {
            0 => Ok(None),
            4 => Ok(Some(u32::from_be_bytes(word))),
            available => Err(IngestionError::TruncatedFrame {
                offset,
                field,
                available,
            }),
        }
    }

    /// Read a field inside a record; any shortfall is a truncated frame
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        let offset = self.position;
        let mut word = [0u8; 4];
        match self.fill(&mut word)? {
            4 => Ok(u32::from_be_bytes(word)),
            available => Err(IngestionError::TruncatedFrame {
                offset,
                field,
                available,
            }),
        }
    }

    /// Fill `buf` exactly or fail with `TruncatedPayload`
    pub fn read_exact_payload(&mut self, buf: &mut [u8]) -> Result<()> {
        let offset = self.position;
        let available = self.fill(buf)?;
        if available < buf.len() {
            return Err(IngestionError::TruncatedPayload {
                offset,
                expected: buf.len() as u32,
                available,
            });
        }
        Ok(())
    }

    /// Read a `len`-byte payload into a fresh buffer
    ///
    /// The buffer grows with the bytes that actually arrive, so a corrupt
    /// length field costs at most the remaining input.
    pub fn read_payload_bounded(&mut self, len: u32) -> Result<Vec<u8>> {
        let offset = self.position;
        let mut buf = Vec::with_capacity((len as usize).min(PAYLOAD_CHUNK));
        let available = (&mut self.inner).take(u64::from(len)).read_to_end(&mut buf)?;
        self.position += available as u64;
        if available < len as usize {
            return Err(IngestionError::TruncatedPayload {
                offset,
                expected: len,
                available,
            });
        }
        Ok(buf)
    }
}
