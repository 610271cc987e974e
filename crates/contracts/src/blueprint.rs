//! StreamLayout - Config Loader output
//!
//! Describes how a recording stream is demultiplexed: the route table,
//! the terminal and checkpoint markers, and output naming.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{DemuxError, EntryKind, RouteEntry, RouteTable, WriteDiscipline};

/// Default staging buffer size (bytes)
pub const DEFAULT_STAGING_CAPACITY: usize = 500_000;

/// Default name of the status artifact
pub const DEFAULT_STATUS_FILE: &str = "stream_meta_data.json";

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete demultiplexing layout
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StreamLayout {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// Stream-wide constants
    #[validate(nested)]
    pub stream: StreamConfig,

    /// One route per entry kind
    #[validate(length(min = 1, message = "at least one route is required"), nested)]
    pub routes: Vec<RouteConfig>,
}

/// Stream-wide constants
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StreamConfig {
    /// Entry kind signalling clean end of stream
    pub terminal_kind: EntryKind,

    /// Entry kind whose sequence number recovery trusts
    pub checkpoint_kind: EntryKind,

    /// Initial staging buffer size (bytes)
    #[serde(default = "default_staging_capacity")]
    #[validate(range(min = 1, message = "staging_capacity must be >= 1"))]
    pub staging_capacity: usize,

    /// Status artifact file name, relative to the output root
    #[serde(default = "default_status_file")]
    #[validate(length(min = 1, message = "status_file cannot be empty"))]
    pub status_file: String,
}

fn default_staging_capacity() -> usize {
    DEFAULT_STAGING_CAPACITY
}

fn default_status_file() -> String {
    DEFAULT_STATUS_FILE.to_string()
}

/// One route table row
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RouteConfig {
    /// Entry kind this row handles
    pub kind: EntryKind,

    /// Output file name, relative to the output root (absent for discard)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "target cannot be empty"))]
    pub target: Option<String>,

    /// Write discipline
    pub discipline: WriteDiscipline,
}

impl RouteConfig {
    fn file(kind: EntryKind, target: &str, discipline: WriteDiscipline) -> Self {
        Self {
            kind,
            target: Some(target.to_string()),
            discipline,
        }
    }

    fn discard(kind: EntryKind) -> Self {
        Self {
            kind,
            target: None,
            discipline: WriteDiscipline::Discard,
        }
    }
}

impl Default for StreamLayout {
    fn default() -> Self {
        Self::pipeline()
    }
}

impl StreamLayout {
    /// Current recorder layout: 15 routes, terminal marker 13
    pub fn pipeline() -> Self {
        use WriteDiscipline::{Append, Overwrite};

        Self {
            version: ConfigVersion::V1,
            stream: StreamConfig {
                terminal_kind: 13,
                checkpoint_kind: 1,
                staging_capacity: DEFAULT_STAGING_CAPACITY,
                status_file: DEFAULT_STATUS_FILE.to_string(),
            },
            routes: vec![
                RouteConfig::discard(0),
                RouteConfig::file(1, "metaData.json", Overwrite),
                RouteConfig::file(2, "recording.tmcpr", Append),
                RouteConfig::file(3, "resource_pack.zip", Overwrite),
                RouteConfig::file(4, "resource_pack_index.json", Overwrite),
                RouteConfig::file(5, "thumb.json", Overwrite),
                RouteConfig::file(6, "visibility", Overwrite),
                RouteConfig::file(7, "visibility.json", Overwrite),
                RouteConfig::file(8, "markers.json", Overwrite),
                RouteConfig::file(9, "asset.zip", Append),
                RouteConfig::file(10, "pattern_assets.zip", Append),
                RouteConfig::file(11, "mods.json", Overwrite),
                RouteConfig::file(12, "experiment_metadata.json", Overwrite),
                RouteConfig::file(13, "end_of_stream.txt", Append),
                RouteConfig::file(14, "actions.tmcpr", Append),
            ],
        }
    }

    /// Older recorder layout: 13 routes, terminal marker 12
    pub fn legacy() -> Self {
        use WriteDiscipline::{Append, Overwrite};

        Self {
            version: ConfigVersion::V1,
            stream: StreamConfig {
                terminal_kind: 12,
                checkpoint_kind: 1,
                staging_capacity: DEFAULT_STAGING_CAPACITY,
                status_file: DEFAULT_STATUS_FILE.to_string(),
            },
            routes: vec![
                RouteConfig::discard(0),
                RouteConfig::file(1, "metaData.json", Overwrite),
                RouteConfig::file(2, "recording.tmcpr", Append),
                RouteConfig::file(3, "resource_pack.zip", Overwrite),
                RouteConfig::file(4, "resource_pack_index.json", Overwrite),
                RouteConfig::file(5, "thumb.json", Overwrite),
                RouteConfig::file(6, "visibility", Overwrite),
                RouteConfig::file(7, "visibility.json", Overwrite),
                RouteConfig::file(8, "markers.json", Overwrite),
                RouteConfig::file(9, "asset.zip", Append),
                RouteConfig::file(10, "pattern_assets.zip", Append),
                RouteConfig::file(11, "mods.json", Overwrite),
                RouteConfig::file(12, "end_of_stream.txt", Append),
            ],
        }
    }

    /// Build the immutable route table
    ///
    /// # Errors
    /// Fails if the routes are not dense over `0..routes.len()` or a marker
    /// kind falls outside the table.
    pub fn to_route_table(&self) -> Result<RouteTable, DemuxError> {
        let mut rows: Vec<&RouteConfig> = self.routes.iter().collect();
        rows.sort_by_key(|r| r.kind);

        let mut entries = Vec::with_capacity(rows.len());
        for (idx, row) in rows.into_iter().enumerate() {
            if row.kind as usize != idx {
                return Err(DemuxError::config_validation(
                    format!("routes[kind={}]", row.kind),
                    format!("route kinds must be dense and unique, expected kind {idx}"),
                ));
            }
            entries.push(RouteEntry {
                kind: row.kind,
                target: row.target.clone(),
                discipline: row.discipline,
            });
        }

        RouteTable::new(
            entries,
            self.stream.terminal_kind,
            self.stream.checkpoint_kind,
        )
    }
}
