//! Stream Summary Writer

use std::fs;
use std::path::{Path, PathBuf};

use contracts::{SinkOp, StreamStatus};
use tracing::info;

use crate::error::DispatcherError;

/// Write the status artifact `root/file_name`, replacing any previous one
pub fn write_status(
    root: &Path,
    file_name: &str,
    status: StreamStatus,
) -> Result<PathBuf, DispatcherError> {
    let path = root.join(file_name);
    fs::write(&path, status.body())
        .map_err(|e| DispatcherError::target(file_name, SinkOp::Write, e))?;
    info!(
        path = %path.display(),
        has_eof = status.has_eof,
        miss_seq_num = status.miss_seq_num,
        "status written"
    );
    Ok(path)
}
