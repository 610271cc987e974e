//! RouteTable - entry kind -> (target, discipline)
//!
//! Built once from a validated `StreamLayout` and shared by reference.

use serde::{Deserialize, Serialize};

use crate::{DemuxError, EntryKind};

/// How payloads reach an output target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteDiscipline {
    /// Concatenate every payload onto a handle held open for the pass
    Append,
    /// Open fresh, write once, close: file holds only the latest payload
    Overwrite,
    /// Accept and drop (reserved null target)
    Discard,
}

/// One resolved route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub kind: EntryKind,
    pub target: Option<String>,
    pub discipline: WriteDiscipline,
}

impl RouteEntry {
    /// Target name for diagnostics (`<discard>` for the null target)
    pub fn target_name(&self) -> &str {
        self.target.as_deref().unwrap_or("<discard>")
    }
}

/// Immutable route table indexed by entry kind
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    terminal_kind: EntryKind,
    checkpoint_kind: EntryKind,
}

impl RouteTable {
    /// Create a route table from dense entries (`entries[i].kind == i`)
    ///
    /// # Errors
    /// Fails if entries are not dense or a marker kind is out of range.
    pub fn new(
        entries: Vec<RouteEntry>,
        terminal_kind: EntryKind,
        checkpoint_kind: EntryKind,
    ) -> Result<Self, DemuxError> {
        if entries.is_empty() {
            return Err(DemuxError::config_validation(
                "routes",
                "at least one route is required",
            ));
        }

        for (idx, entry) in entries.iter().enumerate() {
            if entry.kind as usize != idx {
                return Err(DemuxError::config_validation(
                    format!("routes[{idx}].kind"),
                    format!("route kinds must be dense and unique, expected kind {idx}"),
                ));
            }
        }

        let count = entries.len();
        for (field, kind) in [
            ("stream.terminal_kind", terminal_kind),
            ("stream.checkpoint_kind", checkpoint_kind),
        ] {
            if kind as usize >= count {
                return Err(DemuxError::config_validation(
                    field,
                    format!("kind {kind} outside route table of {count} routes"),
                ));
            }
        }

        Ok(Self {
            entries,
            terminal_kind,
            checkpoint_kind,
        })
    }

    /// Number of routes (valid kinds are `0..route_count`)
    pub fn route_count(&self) -> usize {
        self.entries.len()
    }

    /// Look up a route
    #[inline]
    pub fn get(&self, kind: EntryKind) -> Option<&RouteEntry> {
        self.entries.get(kind as usize)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn terminal_kind(&self) -> EntryKind {
        self.terminal_kind
    }

    pub fn checkpoint_kind(&self) -> EntryKind {
        self.checkpoint_kind
    }

    #[inline]
    pub fn is_terminal(&self, kind: EntryKind) -> bool {
        kind == self.terminal_kind
    }

    #[inline]
    pub fn is_checkpoint(&self, kind: EntryKind) -> bool {
        kind == self.checkpoint_kind
    }

    /// Routes that write to a file
    pub fn file_routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries
            .iter()
            .filter(|e| e.discipline != WriteDiscipline::Discard)
    }
}
