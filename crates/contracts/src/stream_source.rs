//! StreamSource trait - rewindable input abstraction
//!
//! Recovery replays the stream from byte 0, so every source must be able to
//! hand out a fresh reader positioned at the start. Non-seekable streaming
//! inputs cannot implement this trait.

use std::io::Read;

/// Rewindable byte source
///
/// # Example
///
/// ```ignore
/// let mut source = FileSource::new("player_stream.bin");
/// let first = source.open()?;   // pass 1
/// drop(first);
/// let replay = source.open()?;  // recovery: positioned at byte 0 again
/// ```
pub trait StreamSource {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Open a reader positioned at byte 0
    ///
    /// Any previously returned reader must have been dropped (enforced by the
    /// borrow). Calling `open` again re-opens or rewinds the input.
    fn open(&mut self) -> std::io::Result<Box<dyn Read + '_>>;

    /// Total input length in bytes, when cheaply known
    ///
    /// Lets the decoder reject an impossible payload length before
    /// allocating for it.
    fn size_hint(&self) -> Option<u64> {
        None
    }
}
