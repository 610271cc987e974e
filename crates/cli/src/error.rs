//! Error types and process exit codes for CLI operations.

use contracts::{DemuxError, FatalKind};
use thiserror::Error;

/// Exit code for failures that are not a `DemuxError`
pub const EXIT_FAILURE: u8 = 1;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Input stream not found
    #[error("input stream not found: {path}")]
    InputNotFound { path: String },

    /// Layout file not found
    #[error("layout file not found: {path}")]
    LayoutNotFound { path: String },
}

impl CliError {
    pub fn input_not_found(path: impl Into<String>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    pub fn layout_not_found(path: impl Into<String>) -> Self {
        Self::LayoutNotFound { path: path.into() }
    }
}

/// Map a fatal condition to its process exit code
pub fn exit_code(kind: FatalKind) -> u8 {
    match kind {
        FatalKind::Config => 2,
        FatalKind::Input => 3,
        FatalKind::CorruptStream => 4,
        FatalKind::Output => 5,
        FatalKind::Recovery => 6,
    }
}

/// Exit code for an error anywhere in a context chain
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(demux) = cause.downcast_ref::<DemuxError>() {
            return exit_code(demux.kind());
        }
        if let Some(cli) = cause.downcast_ref::<CliError>() {
            return match cli {
                CliError::InputNotFound { .. } => exit_code(FatalKind::Input),
                CliError::LayoutNotFound { .. } => exit_code(FatalKind::Config),
            };
        }
    }
    EXIT_FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn demux_error_behind_context() {
        let err: anyhow::Result<()> = Err(DemuxError::MissingCheckpoint).context("run failed");
        assert_eq!(exit_code_for(&err.unwrap_err()), 6);
    }

    #[test]
    fn corrupt_stream_code() {
        let err = anyhow::Error::new(DemuxError::DataAfterTerminal {
            entry_kind: 2,
            offset: 80,
        });
        assert_eq!(exit_code_for(&err), 4);
    }

    #[test]
    fn cli_errors() {
        let err = anyhow::Error::new(CliError::input_not_found("missing.bin"));
        assert_eq!(exit_code_for(&err), 3);
        let err = anyhow::Error::new(CliError::layout_not_found("missing.toml"));
        assert_eq!(exit_code_for(&err), 2);
    }

    #[test]
    fn other_errors() {
        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), EXIT_FAILURE);
    }
}
