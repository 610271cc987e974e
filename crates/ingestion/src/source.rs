//! Rewindable input sources
//!
//! - `FileSource`: re-opens a path
//! - `MemorySource`: owned bytes
//! - `SeekSource`: any `Read + Seek`, rewound with `seek(0)`

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use contracts::StreamSource;
use tracing::debug;

/// Re-opens a file by path on every `open`
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl StreamSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> std::io::Result<Box<dyn Read + '_>> {
        debug!(path = %self.path.display(), "opening input");
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn size_hint(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }
}

/// In-memory stream
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    data: Bytes,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

impl StreamSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> std::io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.data.clone())))
    }

    fn size_hint(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}

/// Seekable reader rewound to byte 0 on every `open`
///
/// The stream length is measured once, at construction.
pub struct SeekSource<R> {
    name: String,
    inner: R,
    len: Option<u64>,
}

impl<R: Read + Seek> SeekSource<R> {
    pub fn new(name: impl Into<String>, mut inner: R) -> Self {
        let len = inner.seek(SeekFrom::End(0)).ok();
        Self {
            name: name.into(),
            inner,
            len,
        }
    }
}

impl<R: Read + Seek> StreamSource for SeekSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&mut self) -> std::io::Result<Box<dyn Read + '_>> {
        self.inner.seek(SeekFrom::Start(0))?;
        Ok(Box::new(&mut self.inner))
    }

    fn size_hint(&self) -> Option<u64> {
        self.len
    }
}
