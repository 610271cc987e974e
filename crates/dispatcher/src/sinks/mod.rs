//! Sink implementations
//!
//! One sink per write discipline: AppendSink, OverwriteSink, DiscardSink.

mod append;
mod discard;
mod overwrite;

pub use self::append::AppendSink;
pub use self::discard::DiscardSink;
pub use self::overwrite::OverwriteSink;
