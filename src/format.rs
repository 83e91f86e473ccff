//! Supported container formats and what each one can do.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Target container format of an archive request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArchiveFormat {
    /// PKWARE ZIP, DEFLATE compressed, optionally AES-256 encrypted.
    #[default]
    Zip,
    /// Uncompressed GNU TAR.
    Tar,
    /// GNU TAR wrapped in a single GZIP stream.
    TarGz,
}

/// Which request options have an effect for a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCapabilities {
    /// The compression level changes the output.
    pub compression: bool,
    /// A password produces an encrypted archive.
    pub encryption: bool,
    /// Entry order is significant in the output.
    pub ordered: bool,
    /// Two entries may share a path.
    pub duplicates: bool,
}

impl ArchiveFormat {
    /// All formats, in the order a UI should list them.
    pub const ALL: [ArchiveFormat; 3] = [Self::Zip, Self::Tar, Self::TarGz];

    /// Canonical lowercase name (`zip`, `tar`, `tar.gz`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::Tar => ".tar",
            Self::TarGz => ".tar.gz",
        }
    }

    /// MIME type for a download of this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Zip => "application/zip",
            Self::Tar => "application/x-tar",
            Self::TarGz => "application/gzip",
        }
    }

    /// Returns the option matrix for this format.
    ///
    /// ```
    /// use packsmith::ArchiveFormat;
    ///
    /// assert!(ArchiveFormat::Zip.capabilities().encryption);
    /// assert!(!ArchiveFormat::Tar.capabilities().compression);
    /// assert!(ArchiveFormat::TarGz.capabilities().compression);
    /// ```
    pub fn capabilities(&self) -> FormatCapabilities {
        match self {
            Self::Zip => FormatCapabilities {
                compression: true,
                encryption: true,
                ordered: false,
                duplicates: false,
            },
            Self::Tar => FormatCapabilities {
                compression: false,
                encryption: false,
                ordered: true,
                duplicates: true,
            },
            Self::TarGz => FormatCapabilities {
                compression: true,
                encryption: false,
                ordered: true,
                duplicates: true,
            },
        }
    }

    /// Appends this format's extension to `base`.
    ///
    /// This is not plain `base + extension`: surrounding whitespace is
    /// trimmed, a blank base becomes `archive`, and a base that already
    /// carries the extension (in any letter case) is returned unchanged.
    /// Only the exact extension counts, so `backup.tar` still becomes
    /// `backup.tar.tar.gz`.
    ///
    /// ```
    /// use packsmith::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::TarGz.file_name("test"), "test.tar.gz");
    /// assert_eq!(ArchiveFormat::Zip.file_name("photos.ZIP"), "photos.ZIP");
    /// assert_eq!(ArchiveFormat::Tar.file_name("  "), "archive.tar");
    /// assert_eq!(ArchiveFormat::Zip.file_name(" x "), "x.zip");
    /// ```
    pub fn file_name(&self, base: &str) -> String {
        let base = base.trim();
        let base = if base.is_empty() { "archive" } else { base };
        let ext = self.extension();
        let already = base.len() > ext.len()
            && base.is_char_boundary(base.len() - ext.len())
            && base[base.len() - ext.len()..].eq_ignore_ascii_case(ext);
        if already {
            base.to_string()
        } else {
            format!("{}{}", base, ext)
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArchiveFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match lower.as_str() {
            "zip" => Ok(Self::Zip),
            "tar" => Ok(Self::Tar),
            "tar.gz" | "tgz" => Ok(Self::TarGz),
            _ => Err(Error::InvalidInput(format!(
                "Unsupported archive format '{}' (expected zip, tar or tar.gz)",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions() {
        assert_eq!(ArchiveFormat::Zip.extension(), ".zip");
        assert_eq!(ArchiveFormat::Tar.extension(), ".tar");
        assert_eq!(ArchiveFormat::TarGz.extension(), ".tar.gz");
    }

    #[test]
    fn test_parse() {
        assert_eq!("ZIP".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Zip);
        assert_eq!("tar".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Tar);
        assert_eq!(".tar.gz".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::TarGz);
        assert_eq!("tgz".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::TarGz);
        let err = "rar".parse::<ArchiveFormat>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for format in ArchiveFormat::ALL {
            assert_eq!(format.to_string().parse::<ArchiveFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(ArchiveFormat::Zip.file_name("test"), "test.zip");
        assert_eq!(ArchiveFormat::Zip.file_name("test.zip"), "test.zip");
        assert_eq!(ArchiveFormat::Zip.file_name(""), "archive.zip");
        assert_eq!(ArchiveFormat::Zip.file_name(" x "), "x.zip");
        assert_eq!(ArchiveFormat::Tar.file_name("backup.tar.gz"), "backup.tar.gz.tar");
        assert_eq!(ArchiveFormat::TarGz.file_name("backup.tar"), "backup.tar.tar.gz");
        assert_eq!(ArchiveFormat::TarGz.file_name(".tar.gz"), ".tar.gz.tar.gz");
        assert_eq!(ArchiveFormat::Zip.file_name("ünï.zip"), "ünï.zip");
    }

    #[test]
    fn test_capabilities_matrix() {
        let zip = ArchiveFormat::Zip.capabilities();
        assert!(zip.compression && zip.encryption && !zip.ordered && !zip.duplicates);
        let tar = ArchiveFormat::Tar.capabilities();
        assert!(!tar.compression && !tar.encryption && tar.ordered && tar.duplicates);
        let tgz = ArchiveFormat::TarGz.capabilities();
        assert!(tgz.compression && !tgz.encryption && tgz.ordered && tgz.duplicates);
    }
}
