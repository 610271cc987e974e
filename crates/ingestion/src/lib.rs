//! # Ingestion
//!
//! Recording stream decoding.
//!
//! Responsibilities:
//! - Read big-endian header fields with byte-offset tracking (`FrameReader`)
//! - Decode records header-first, payload second (`RecordDecoder`)
//! - Stage payloads in a grow-only buffer (`StagingBuffer`)
//! - Provide rewindable input sources for recovery replay
//! - Encode framed streams for fixtures (`StreamEncoder`)
//!
//! ## Usage Example
//!
//! ```
//! use ingestion::{RecordDecoder, StagingBuffer, StreamEncoder};
//!
//! let mut enc = StreamEncoder::new();
//! enc.record(2, 0, 0, b"abc").record(12, 1, 0, b"");
//! let bytes = enc.finish();
//!
//! let mut decoder = RecordDecoder::new(&bytes[..]);
//! let mut staging = StagingBuffer::new(16);
//! while let Some(record) = decoder.next_record(&mut staging).unwrap() {
//!     println!("kind={} len={}", record.entry_kind(), record.payload.len());
//! }
//! ```

mod decoder;
mod encoder;
mod error;
mod frame;
mod source;
mod staging;

// Re-exports
pub use decoder::RecordDecoder;
pub use encoder::StreamEncoder;
pub use error::{IngestionError, Result};
pub use frame::FrameReader;
pub use source::{FileSource, MemorySource, SeekSource};
pub use staging::StagingBuffer;
