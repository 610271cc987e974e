//! OutputSinks - the Output Sink Manager
//!
//! Holds one sink per route, indexed by entry kind. Append targets are
//! created (truncated) when the manager opens; overwrite targets are only
//! touched when a record reaches them.

use std::fs::{self, File};
use std::path::Path;

use contracts::{DemuxError, EntryKind, OutputSink, RouteEntry, RouteTable, SinkOp, WriteDiscipline};
use tracing::{debug, info, instrument};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{AppendSink, DiscardSink, OverwriteSink};

/// Per-pass set of output sinks
pub struct OutputSinks {
    handles: Vec<SinkHandle>,
}

impl OutputSinks {
    /// Open file-backed sinks for every route under `root`
    #[instrument(
        name = "output_sinks_open",
        skip(table),
        fields(root = %root.display(), routes = table.route_count())
    )]
    pub fn open(root: &Path, table: &RouteTable) -> Result<Self, DemuxError> {
        fs::create_dir_all(root).map_err(|source| DispatcherError::OutputRoot {
            path: root.to_path_buf(),
            source,
        })?;

        let mut handles = Vec::with_capacity(table.route_count());
        for entry in table.entries() {
            handles.push(SinkHandle::new(create_sink(root, entry)?));
        }
        info!(sinks = handles.len(), "output sinks opened");
        Ok(Self { handles })
    }

    /// Sinks that drop everything (diagnostic scan)
    pub fn discarding(table: &RouteTable) -> Self {
        let handles = table
            .entries()
            .iter()
            .map(|e| SinkHandle::new(Box::new(DiscardSink::new(e.target_name()))))
            .collect();
        Self { handles }
    }

    pub fn route_count(&self) -> usize {
        self.handles.len()
    }

    /// Route one payload to the sink for `kind`
    pub fn write(&mut self, kind: EntryKind, payload: &[u8]) -> Result<(), DemuxError> {
        let route_count = self.handles.len();
        let handle = self
            .handles
            .get_mut(kind as usize)
            .ok_or(DispatcherError::NoRoute { kind, route_count })?;
        handle.write(payload)
    }

    /// Flush and close every sink, returning the first error
    #[instrument(name = "output_sinks_close", skip(self))]
    pub fn close_all(&mut self) -> Result<(), DemuxError> {
        let mut first_err = None;
        for handle in &mut self.handles {
            if let Err(e) = handle.close() {
                first_err.get_or_insert(e);
            }
        }
        debug!(sinks = self.handles.len(), "output sinks closed");
        first_err.map_or(Ok(()), Err)
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.target().to_string(), h.metrics().snapshot()))
            .collect()
    }
}

fn create_sink(root: &Path, entry: &RouteEntry) -> Result<Box<dyn OutputSink>, DemuxError> {
    let sink: Box<dyn OutputSink> = match (entry.discipline, entry.target.as_deref()) {
        (WriteDiscipline::Append, Some(target)) => Box::new(AppendSink::open(root, target)?),
        (WriteDiscipline::Overwrite, Some(target)) => Box::new(OverwriteSink::new(root, target)),
        (WriteDiscipline::Discard, _) => Box::new(DiscardSink::default()),
        (_, None) => {
            return Err(DemuxError::config_validation(
                format!("routes[kind={}].target", entry.kind),
                "append/overwrite routes require a target",
            ))
        }
    };
    Ok(sink)
}

/// Truncate (or create empty) every file target under `root`
#[instrument(name = "reset_outputs", skip(table), fields(root = %root.display()))]
pub fn reset_outputs(root: &Path, table: &RouteTable) -> Result<(), DispatcherError> {
    fs::create_dir_all(root).map_err(|source| DispatcherError::OutputRoot {
        path: root.to_path_buf(),
        source,
    })?;
    for entry in table.file_routes() {
        let target = entry.target_name();
        File::create(root.join(target))
            .map_err(|e| DispatcherError::target(target, SinkOp::Reset, e))?;
    }
    info!(targets = table.file_routes().count(), "output targets reset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn table() -> RouteTable {
        let entry = |kind, target: Option<&str>, discipline| RouteEntry {
            kind,
            target: target.map(String::from),
            discipline,
        };
        RouteTable::new(
            vec![
                entry(0, None, WriteDiscipline::Discard),
                entry(1, Some("meta.json"), WriteDiscipline::Overwrite),
                entry(2, Some("log.bin"), WriteDiscipline::Append),
            ],
            2,
            1,
        )
        .unwrap()
    }

    #[test]
    fn routes_by_kind() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("out");
        let mut sinks = OutputSinks::open(&root, &table()).unwrap();

        // append target exists from the start, overwrite target does not
        assert!(root.join("log.bin").exists());
        assert!(!root.join("meta.json").exists());

        sinks.write(0, b"dropped").unwrap();
        sinks.write(1, b"{\"a\":1}").unwrap();
        sinks.write(2, b"x").unwrap();
        sinks.write(1, b"{}").unwrap();
        sinks.write(2, b"y").unwrap();
        sinks.close_all().unwrap();

        assert_eq!(fs::read(root.join("log.bin")).unwrap(), b"xy");
        assert_eq!(fs::read(root.join("meta.json")).unwrap(), b"{}");

        let metrics = sinks.metrics();
        assert_eq!(metrics[2].0, "log.bin");
        assert_eq!(metrics[2].1.write_count, 2);
        assert_eq!(metrics[0].1.bytes_written, 7);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut sinks = OutputSinks::discarding(&table());
        let err = sinks.write(3, b"").unwrap_err();
        assert!(matches!(
            err,
            DemuxError::InvalidEntryKind {
                entry_kind: 3,
                route_count: 3,
                ..
            }
        ));
    }

    #[test]
    fn discarding_creates_no_files() {
        let dir = tempdir().unwrap();
        let mut sinks = OutputSinks::discarding(&table());
        sinks.write(2, b"abc").unwrap();
        sinks.close_all().unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn reset_truncates_every_file_target() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("meta.json"), b"old").unwrap();
        fs::write(dir.path().join("log.bin"), b"old").unwrap();

        reset_outputs(dir.path(), &table()).unwrap();
        assert_eq!(fs::read(dir.path().join("meta.json")).unwrap().len(), 0);
        assert_eq!(fs::read(dir.path().join("log.bin")).unwrap().len(), 0);
    }
}
