//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Stream Model
//! - Input is one finite, rewindable byte sequence of big-endian framed records
//! - Payloads are opaque; only the header drives routing and corruption checks

mod blueprint;
mod error;
mod record;
mod route;
mod sink;
mod status;
mod stream_source;

pub use blueprint::*;
pub use error::*;
pub use record::*;
pub use route::*;
pub use sink::OutputSink;
pub use status::StreamStatus;
pub use stream_source::StreamSource;
