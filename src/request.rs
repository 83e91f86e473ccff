//! Archive requests and their results.

use crate::crypto::Password;
use crate::write::ArchiveOptions;
use crate::{ArchiveEntry, ArchiveFormat, Result};
use std::time::SystemTime;

/// Everything needed to build one archive.
///
/// A request is built per user action. The orchestrator borrows it mutably
/// for the duration of a call and updates each entry's status in place, so
/// after a call the entries show exactly how far processing got.
///
/// ```rust
/// use packsmith::{ArchiveEntry, ArchiveFormat, ArchiveRequest};
///
/// let mut request = ArchiveRequest::new(ArchiveFormat::Zip, "test").level(6)?;
/// request.push(ArchiveEntry::from_bytes("a.txt", "hello")?);
/// request.push(ArchiveEntry::from_bytes("dir/b.txt", "world")?);
/// assert_eq!(request.entries().len(), 2);
/// assert_eq!(request.suggested_file_name(), "test.zip");
/// # Ok::<(), packsmith::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveRequest {
    format: ArchiveFormat,
    entries: Vec<ArchiveEntry>,
    options: ArchiveOptions,
    output_name: String,
}

impl ArchiveRequest {
    /// Creates an empty request for `format` with base file name `output_name`.
    pub fn new(format: ArchiveFormat, output_name: impl Into<String>) -> Self {
        Self {
            format,
            entries: Vec::new(),
            options: ArchiveOptions::default(),
            output_name: output_name.into(),
        }
    }

    /// Replaces all entries.
    pub fn with_entries(mut self, entries: Vec<ArchiveEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// Replaces all options.
    pub fn options(mut self, options: ArchiveOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the compression level (strict validation).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidCompressionLevel`] above 9.
    pub fn level(mut self, level: u32) -> Result<Self> {
        self.options = self.options.level(level)?;
        Ok(self)
    }

    /// Sets the compression level, clamping values above 9.
    pub fn level_clamped(mut self, level: u32) -> Self {
        self.options = self.options.level_clamped(level);
        self
    }

    /// Sets the password. Only ZIP output is encrypted.
    pub fn password(mut self, password: impl Into<Password>) -> Self {
        self.options = self.options.password(password);
        self
    }

    /// Sets the fallback modification time.
    pub fn modified(mut self, modified: SystemTime) -> Self {
        self.options = self.options.modified(modified);
        self
    }

    /// Enables reproducible output.
    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.options = self.options.deterministic(deterministic);
        self
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: ArchiveEntry) {
        self.entries.push(entry);
    }

    /// Target format.
    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Changes the target format, keeping entries and options.
    pub fn set_format(&mut self, format: ArchiveFormat) {
        self.format = format;
    }

    /// Entries in processing order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Mutable entries, e.g. to rename or reorder them.
    pub fn entries_mut(&mut self) -> &mut Vec<ArchiveEntry> {
        &mut self.entries
    }

    /// Current options.
    pub fn archive_options(&self) -> &ArchiveOptions {
        &self.options
    }

    /// Base file name as given.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Changes the base file name.
    pub fn set_output_name(&mut self, name: impl Into<String>) {
        self.output_name = name.into();
    }

    /// File name the result should be saved under.
    pub fn suggested_file_name(&self) -> String {
        self.format.file_name(&self.output_name)
    }

    pub(crate) fn parts_mut(&mut self) -> (ArchiveFormat, &ArchiveOptions, &mut [ArchiveEntry]) {
        (self.format, &self.options, &mut self.entries)
    }
}

/// The finished archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutput {
    /// Complete container bytes.
    pub bytes: Vec<u8>,
    /// `output_name` plus the format's extension.
    pub suggested_file_name: String,
    /// Format of `bytes`.
    pub format: ArchiveFormat,
    /// Number of entries written.
    pub entries_written: usize,
    /// Sum of the uncompressed entry sizes.
    pub input_bytes: u64,
}

impl ArchiveOutput {
    /// Size of the container in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the container is empty (never the case for a successful run).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Output size divided by input size; 0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.bytes.len() as f64 / self.input_bytes as f64
        }
    }

    /// MIME type of the container.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}
