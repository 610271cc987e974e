//! Dispatcher error types

use std::path::PathBuf;

use contracts::{DemuxError, EntryKind, SinkOp};
use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Output root directory could not be created
    #[error("cannot prepare output root '{}': {source}", path.display())]
    OutputRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target file operation failed
    #[error("output target '{target}' {op} error: {source}")]
    Target {
        target: String,
        op: SinkOp,
        #[source]
        source: std::io::Error,
    },

    /// No sink registered for the entry kind
    #[error("no output route for entry kind {kind} ({route_count} routes)")]
    NoRoute { kind: EntryKind, route_count: usize },
}

impl DispatcherError {
    /// Create a target error
    pub fn target(target: impl Into<String>, op: SinkOp, source: std::io::Error) -> Self {
        Self::Target {
            target: target.into(),
            op,
            source,
        }
    }
}

impl From<DispatcherError> for DemuxError {
    fn from(err: DispatcherError) -> Self {
        match err {
            DispatcherError::OutputRoot { path, source } => {
                DemuxError::sink(path.display().to_string(), SinkOp::Open, source)
            }
            DispatcherError::Target { target, op, source } => DemuxError::sink(target, op, source),
            DispatcherError::NoRoute { kind, route_count } => DemuxError::InvalidEntryKind {
                entry_kind: kind,
                route_count,
                offset: 0,
            },
        }
    }
}
