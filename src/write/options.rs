//! Options for archive creation.

use crate::crypto::Password;
use crate::{Error, Result};
use std::fmt;
use std::time::SystemTime;

/// A DEFLATE/GZIP compression level between 0 and 9.
///
/// Level 0 stores ZIP entries uncompressed. The level has no effect on
/// plain TAR output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// No compression.
    pub const STORE: Self = Self(0);
    /// Fastest compression.
    pub const FASTEST: Self = Self(1);
    /// The zlib default.
    pub const DEFAULT: Self = Self(6);
    /// Best compression.
    pub const BEST: Self = Self(9);

    /// Creates a level, rejecting values above 9.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCompressionLevel`] if `level` is greater than 9.
    ///
    /// ```rust
    /// use packsmith::CompressionLevel;
    ///
    /// assert_eq!(CompressionLevel::new(9)?.get(), 9);
    /// assert!(CompressionLevel::new(10).is_err());
    /// # Ok::<(), packsmith::Error>(())
    /// ```
    pub fn new(level: u32) -> Result<Self> {
        if level > 9 {
            return Err(Error::InvalidCompressionLevel { level });
        }
        Ok(Self(level as u8))
    }

    /// Creates a level, clamping values above 9.
    pub fn clamped(level: u32) -> Self {
        Self(level.min(9) as u8)
    }

    /// The numeric level.
    pub fn get(&self) -> u32 {
        u32::from(self.0)
    }

    /// True for level 0.
    pub fn is_store(&self) -> bool {
        self.0 == 0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for CompressionLevel {
    type Error = Error;

    fn try_from(level: u32) -> Result<Self> {
        Self::new(level)
    }
}

/// Options applied to every entry of an archive.
///
/// # Example
///
/// ```rust
/// use packsmith::ArchiveOptions;
///
/// let options = ArchiveOptions::new()
///     .level(9)?
///     .password("correct horse")
///     .deterministic(true);
/// assert_eq!(options.level.get(), 9);
/// # Ok::<(), packsmith::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveOptions {
    /// Compression level for ZIP entries and the GZIP stream.
    pub level: CompressionLevel,
    /// Password for AES-256 ZIP encryption. Ignored for TAR formats.
    pub password: Option<Password>,
    /// Timestamp for entries whose source has none.
    pub modified: Option<SystemTime>,
    /// Ignore source timestamps and write fixed ones, so equal input always
    /// gives equal bytes.
    pub deterministic: bool,
}

impl ArchiveOptions {
    /// Creates default options: level 6, no password, source timestamps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level (strict validation).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCompressionLevel`] if `level` is greater than 9.
    pub fn level(mut self, level: u32) -> Result<Self> {
        self.level = CompressionLevel::new(level)?;
        Ok(self)
    }

    /// Sets the compression level, clamping values above 9.
    pub fn level_clamped(mut self, level: u32) -> Self {
        self.level = CompressionLevel::clamped(level);
        self
    }

    /// Sets the encryption password.
    pub fn password(mut self, password: impl Into<Password>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the fallback modification time.
    pub fn modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Enables reproducible output.
    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Modification time to record for an entry, as seconds since the epoch.
    ///
    /// `None` means "no usable timestamp"; encoders then write their own
    /// fixed default.
    pub(crate) fn entry_mtime(&self, source: Option<SystemTime>) -> Option<u64> {
        if self.deterministic {
            return None;
        }
        source
            .or(self.modified)
            .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
    }
}
