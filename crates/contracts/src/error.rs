//! Layered error definitions
//!
//! Categorized by source: config / input / stream / sink / recovery

use thiserror::Error;

/// Unified error type
///
/// Every variant is fatal for the run. Soft conditions (sequence gaps and
/// regressions) are never errors; they are carried in the pass report.
#[derive(Debug, Error)]
pub enum DemuxError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Input Errors =====
    /// Input source could not be opened (or re-opened for recovery)
    #[error("cannot open input '{source_name}': {source}")]
    InputOpen {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    // ===== Stream Corruption =====
    /// 1-3 bytes left where a 4-byte field was expected, or a record cut
    /// short after its entry kind was read
    #[error("truncated frame at offset {offset}: {field} needs 4 bytes, {available} available")]
    TruncatedFrame {
        offset: u64,
        field: &'static str,
        available: usize,
    },

    /// Payload shorter than its length field
    #[error("truncated payload at offset {offset}: expected {expected} bytes, {available} available")]
    TruncatedPayload {
        offset: u64,
        expected: u32,
        available: usize,
    },

    /// Entry kind outside the route table
    #[error("corrupted data with entry kind {entry_kind} at offset {offset} (route count {route_count})")]
    InvalidEntryKind {
        entry_kind: u32,
        route_count: usize,
        offset: u64,
    },

    /// A record follows the terminal marker
    #[error("record of kind {entry_kind} found after terminal marker at offset {offset}")]
    DataAfterTerminal { entry_kind: u32, offset: u64 },

    // ===== Sink Errors =====
    /// Output target could not be opened, written, flushed or closed
    #[error("output target '{target}' {op} error: {source}")]
    Sink {
        target: String,
        op: SinkOp,
        #[source]
        source: std::io::Error,
    },

    // ===== Recovery Errors =====
    /// Stream ended without terminal marker and no checkpoint was ever seen
    #[error("stream has no terminal marker and no checkpoint record; nothing to recover to")]
    MissingCheckpoint,

    /// Recovery replay ended before reaching its stop sequence
    #[error("recovery pass ended before reaching checkpoint seq={stop_sequence}")]
    CheckpointNotReached { stop_sequence: u32 },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which output operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOp {
    Open,
    Write,
    Flush,
    Close,
    Reset,
}

impl std::fmt::Display for SinkOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SinkOp::Open => "open",
            SinkOp::Write => "write",
            SinkOp::Flush => "flush",
            SinkOp::Close => "close",
            SinkOp::Reset => "reset",
        };
        f.write_str(s)
    }
}

/// Coarse discriminant of a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
    Config,
    Input,
    CorruptStream,
    Output,
    Recovery,
}

impl DemuxError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create input open error
    pub fn input_open(source_name: impl Into<String>, source: std::io::Error) -> Self {
        Self::InputOpen {
            source_name: source_name.into(),
            source,
        }
    }

    /// Create sink error
    pub fn sink(target: impl Into<String>, op: SinkOp, source: std::io::Error) -> Self {
        Self::Sink {
            target: target.into(),
            op,
            source,
        }
    }

    /// Classify the error
    pub fn kind(&self) -> FatalKind {
        match self {
            Self::ConfigParse { .. } | Self::ConfigValidation { .. } => FatalKind::Config,
            Self::InputOpen { .. } | Self::Io(_) => FatalKind::Input,
            Self::TruncatedFrame { .. }
            | Self::TruncatedPayload { .. }
            | Self::InvalidEntryKind { .. }
            | Self::DataAfterTerminal { .. } => FatalKind::CorruptStream,
            Self::Sink { .. } => FatalKind::Output,
            Self::MissingCheckpoint | Self::CheckpointNotReached { .. } => FatalKind::Recovery,
        }
    }

    /// Approximate stream position of the failure, when known
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::TruncatedFrame { offset, .. }
            | Self::TruncatedPayload { offset, .. }
            | Self::InvalidEntryKind { offset, .. }
            | Self::DataAfterTerminal { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
