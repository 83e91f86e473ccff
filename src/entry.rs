//! Archive entries and the sources their bytes come from.
//!
//! An [`ArchiveEntry`] pairs an opaque [`EntrySource`] with the
//! [`ArchivePath`] it will have in the container, plus the status and
//! progress the orchestrator updates while it works.
//!
//! # Sources
//!
//! The orchestrator never looks inside a source; it only asks for the full
//! byte content when the entry's turn comes. Two sources are built in:
//!
//! | Source | Reads from | When |
//! |--------|------------|------|
//! | [`MemorySource`] | an owned buffer | always succeeds |
//! | [`FileSource`] | a file on disk | at processing time |
//!
//! Implement [`EntrySource`] to feed bytes from anywhere else.

use crate::{ArchivePath, Result};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// A readable input whose bytes become one archive entry.
///
/// Sources are shared (`Arc`) and must be usable from a blocking worker
/// thread, hence `Send + Sync`.
pub trait EntrySource: Send + Sync {
    /// Reads the complete content.
    fn read_bytes(&self) -> io::Result<Vec<u8>>;

    /// Expected size in bytes, if known without reading.
    fn size_hint(&self) -> Option<u64> {
        None
    }

    /// Modification time to record in the container, if the source has one.
    fn modified(&self) -> Option<SystemTime> {
        None
    }

    /// Short human-readable description used in logs.
    fn describe(&self) -> String {
        "<source>".to_string()
    }
}

/// Bytes already held in memory.
#[derive(Clone)]
pub struct MemorySource {
    data: Arc<[u8]>,
    modified: Option<SystemTime>,
}

impl MemorySource {
    /// Wraps a buffer.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Arc::from(data.into()),
            modified: None,
        }
    }

    /// Sets the modification time written into TAR headers and ZIP records.
    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("len", &self.data.len())
            .field("modified", &self.modified)
            .finish()
    }
}

impl EntrySource for MemorySource {
    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.data.to_vec())
    }

    fn size_hint(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    fn describe(&self) -> String {
        format!("<{} bytes in memory>", self.data.len())
    }
}

/// A file on the local file system, read when its entry is processed.
///
/// The file is not opened at construction time, so a file that disappears
/// before processing surfaces as a processing failure of its entry.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a source for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntrySource for FileSource {
    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }

    fn size_hint(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|m| m.len())
    }

    fn modified(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Processing state of one entry.
///
/// Within one call the state only moves forward:
/// `Pending -> Processing -> Completed | Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryStatus {
    /// Not yet touched by the current call.
    #[default]
    Pending,
    /// Bytes are being read or written.
    Processing,
    /// Written into the container.
    Completed,
    /// Reading or writing failed.
    Error,
}

impl EntryStatus {
    /// True for `Completed` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Position in the lifecycle, used to check forward-only transitions.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Processing => 1,
            Self::Completed | Self::Error => 2,
        }
    }

    /// Lowercase name, as used in JSON and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file to place in the archive.
#[derive(Clone)]
pub struct ArchiveEntry {
    source: Arc<dyn EntrySource>,
    path: ArchivePath,
    status: EntryStatus,
    progress: u8,
}

impl ArchiveEntry {
    /// Creates a pending entry.
    pub fn new(path: ArchivePath, source: impl EntrySource + 'static) -> Self {
        Self::with_shared_source(path, Arc::new(source))
    }

    /// Creates a pending entry around an already shared source.
    pub fn with_shared_source(path: ArchivePath, source: Arc<dyn EntrySource>) -> Self {
        Self {
            source,
            path,
            status: EntryStatus::Pending,
            progress: 0,
        }
    }

    /// Creates an entry from in-memory bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchivePath`](crate::Error::InvalidArchivePath)
    /// unless `path` follows the [`ArchivePath`] rules: besides being
    /// non-empty it must be relative, without `//`, a trailing `/`, or `.`
    /// and `..` segments. Use [`ArchivePath::normalize`] for names typed by
    /// a user.
    ///
    /// ```
    /// use packsmith::ArchiveEntry;
    ///
    /// let entry = ArchiveEntry::from_bytes("dir/b.txt", b"world".to_vec()).unwrap();
    /// assert_eq!(entry.path().as_str(), "dir/b.txt");
    /// assert!(ArchiveEntry::from_bytes("dir//b.txt", "x").is_err());
    /// assert!(ArchiveEntry::from_bytes("./b.txt", "x").is_err());
    /// ```
    pub fn from_bytes(path: &str, data: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self::new(ArchivePath::new(path)?, MemorySource::new(data)))
    }

    /// Creates an entry for a file on disk, stored under `path`.
    ///
    /// The file is not opened until the entry is processed.
    ///
    /// # Errors
    ///
    /// Same path rules as [`from_bytes`](Self::from_bytes).
    pub fn from_file(path: &str, file: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(ArchivePath::new(path)?, FileSource::new(file)))
    }

    /// The shared source handle.
    pub fn source(&self) -> &Arc<dyn EntrySource> {
        &self.source
    }

    /// Destination path inside the archive.
    pub fn path(&self) -> &ArchivePath {
        &self.path
    }

    /// Renames the entry.
    pub fn set_path(&mut self, path: ArchivePath) {
        self.path = path;
    }

    /// Current status.
    pub fn status(&self) -> EntryStatus {
        self.status
    }

    /// Current progress, 0 to 100.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Returns the entry to `Pending` with zero progress.
    pub fn reset(&mut self) {
        self.status = EntryStatus::Pending;
        self.progress = 0;
    }

    pub(crate) fn set_state(&mut self, status: EntryStatus, progress: u8) {
        debug_assert!(status.rank() >= self.status.rank());
        debug_assert!(status != self.status || progress >= self.progress);
        self.status = status;
        self.progress = progress.min(100);
    }
}

impl fmt::Debug for ArchiveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("path", &self.path)
            .field("source", &self.source.describe())
            .field("status", &self.status)
            .field("progress", &self.progress)
            .finish()
    }
}
