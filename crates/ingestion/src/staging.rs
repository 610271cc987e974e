//! StagingBuffer - reusable payload buffer
//!
//! Grow-only: an oversized payload reallocates to exactly its length and the
//! larger buffer is kept for the rest of the pass.

use tracing::debug;

/// Payload staging area shared by every record of a pass
#[derive(Debug)]
pub struct StagingBuffer {
    buf: Vec<u8>,
    grow_count: u64,
}

impl StagingBuffer {
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            buf: vec![0; initial_capacity],
            grow_count: 0,
        }
    }

    /// Current usable capacity in bytes
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Reallocations performed since construction
    pub fn grow_count(&self) -> u64 {
        self.grow_count
    }

    /// Borrow a slice of exactly `len` bytes, growing if needed
    pub fn prepare(&mut self, len: usize) -> &mut [u8] {
        if len > self.buf.len() {
            debug!(from = self.buf.len(), to = len, "growing staging buffer");
            self.buf = vec![0; len];
            self.grow_count += 1;
        }
        &mut self.buf[..len]
    }

    /// Take over an already-filled payload longer than the current buffer
    ///
    /// Counts as a grow; the payload becomes the new buffer and is retained.
    pub fn adopt(&mut self, payload: Vec<u8>) {
        if payload.len() <= self.buf.len() {
            self.buf[..payload.len()].copy_from_slice(&payload);
            return;
        }
        debug!(from = self.buf.len(), to = payload.len(), "growing staging buffer");
        self.buf = payload;
        self.grow_count += 1;
    }

    /// View of the first `len` staged bytes
    pub fn staged(&self, len: usize) -> &[u8] {
        &self.buf[..len]
    }
}
