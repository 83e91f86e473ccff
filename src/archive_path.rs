//! Logical destination paths for archive entries.
//!
//! Every entry carries an [`ArchivePath`]: the `/`-separated name it will
//! have inside the container. Paths are user-editable, so they are validated
//! whenever they are set rather than when the archive is written.

use crate::{Error, Result};
use std::fmt;

/// Longest path a ZIP local header can store (the name length is a `u16`).
const MAX_PATH_LENGTH: usize = u16::MAX as usize;

/// A validated, `/`-separated path inside an archive.
///
/// A valid path:
/// - is non-empty and contains no NUL bytes
/// - is relative (does not start with `/`)
/// - has no empty segments (no `//`, no trailing `/`)
/// - has no `.` or `..` segments
///
/// These rules keep the produced containers safe to extract with common
/// tools. Folder nesting is expressed with `/`.
///
/// # Examples
///
/// ```
/// use packsmith::ArchivePath;
///
/// let path = ArchivePath::new("photos/2024/beach.jpg").unwrap();
/// assert_eq!(path.file_name(), "beach.jpg");
///
/// assert!(ArchivePath::new("").is_err());
/// assert!(ArchivePath::new("../escape.txt").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchivePath(String);

impl ArchivePath {
    /// Creates a path from a string, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchivePath`] if the string breaks one of the
    /// rules listed on the type.
    pub fn new(s: &str) -> Result<Self> {
        validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// Builds a path from a name typed by a user or taken from the host
    /// file system.
    ///
    /// Backslashes become `/`, leading and trailing separators are dropped,
    /// repeated separators collapse and `.` segments are removed. `..` is
    /// still rejected.
    ///
    /// ```
    /// use packsmith::ArchivePath;
    ///
    /// let path = ArchivePath::normalize(r"\docs\\notes\.\todo.txt").unwrap();
    /// assert_eq!(path.as_str(), "docs/notes/todo.txt");
    /// ```
    pub fn normalize(s: &str) -> Result<Self> {
        let replaced = s.replace('\\', "/");
        let joined = replaced
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self::new(&joined)
    }

    /// Returns the path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the folder part, if the path is nested.
    pub fn parent(&self) -> Option<&str> {
        self.0.rfind('/').map(|idx| &self.0[..idx])
    }

    /// Number of folder levels above the file.
    pub fn depth(&self) -> usize {
        self.0.matches('/').count()
    }

    /// Returns a new path with `folder` prepended.
    ///
    /// # Errors
    ///
    /// Returns an error if `folder` is not itself a valid path.
    pub fn under(&self, folder: &str) -> Result<Self> {
        Self::new(&format!("{}/{}", folder, self.0))
    }
}

fn validate(s: &str) -> Result<()> {
    if s.is_empty() {
        return Err(Error::InvalidArchivePath("empty path".into()));
    }
    if s.contains('\0') {
        return Err(Error::InvalidArchivePath("contains NUL byte".into()));
    }
    if s.len() > MAX_PATH_LENGTH {
        return Err(Error::InvalidArchivePath(format!(
            "path is {} bytes, maximum is {}",
            s.len(),
            MAX_PATH_LENGTH
        )));
    }
    if s.starts_with('/') {
        return Err(Error::InvalidArchivePath(format!(
            "'{}' is absolute",
            s
        )));
    }
    if s.ends_with('/') {
        return Err(Error::InvalidArchivePath(format!(
            "'{}' ends with a folder separator",
            s
        )));
    }

    for segment in s.split('/') {
        match segment {
            "" => {
                return Err(Error::InvalidArchivePath(format!(
                    "'{}' has an empty segment",
                    s
                )));
            }
            "." | ".." => {
                return Err(Error::InvalidArchivePath(format!(
                    "'{}' contains a '{}' segment",
                    s, segment
                )));
            }
            _ => {}
        }
    }

    Ok(())
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ArchivePath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ArchivePath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        validate(&s)?;
        Ok(Self(s))
    }
}
