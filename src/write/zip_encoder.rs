//! ZIP output through the `zip` crate.

use super::encoder::ContainerEncoder;
use crate::ArchivePath;
use crate::crypto::Password;
use crate::write::options::CompressionLevel;
use std::io::{self, Cursor, Write};
use time::OffsetDateTime;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes DEFLATE (or STORE at level 0) entries, AES-256 encrypted when a
/// password is set.
pub(crate) struct ZipEncoder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    level: CompressionLevel,
    password: Option<Password>,
}

impl ZipEncoder {
    pub(crate) fn new(level: CompressionLevel, password: Option<Password>) -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            level,
            password,
        }
    }

    fn file_options(&self, size: usize, mtime: Option<u64>) -> SimpleFileOptions {
        let options = SimpleFileOptions::default()
            .unix_permissions(0o644)
            .last_modified_time(zip_datetime(mtime))
            .large_file(size as u64 >= u64::from(u32::MAX));
        if self.level.is_store() {
            options.compression_method(CompressionMethod::Stored)
        } else {
            options
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(self.level.get() as _))
        }
    }
}

impl ContainerEncoder for ZipEncoder {
    fn append(&mut self, path: &ArchivePath, data: &[u8], mtime: Option<u64>) -> io::Result<()> {
        let options = self.file_options(data.len(), mtime);
        match &self.password {
            #[cfg(feature = "aes")]
            Some(password) => {
                let options = options.with_aes_encryption(zip::AesMode::Aes256, password.as_str());
                self.writer
                    .start_file(path.as_str(), options)
                    .map_err(io::Error::other)?;
            }
            #[cfg(not(feature = "aes"))]
            Some(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "AES encryption is not compiled in",
                ));
            }
            None => {
                self.writer
                    .start_file(path.as_str(), options)
                    .map_err(io::Error::other)?;
            }
        }
        self.writer.write_all(data)
    }

    fn finish(self: Box<Self>) -> io::Result<Vec<u8>> {
        let cursor = self.writer.finish().map_err(io::Error::other)?;
        Ok(cursor.into_inner())
    }
}

/// Converts seconds since the epoch to a ZIP (MS-DOS) timestamp.
///
/// Times outside the DOS range (1980-2107) and `None` give the DOS epoch.
fn zip_datetime(mtime: Option<u64>) -> zip::DateTime {
    mtime
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
        .and_then(|utc| zip::DateTime::try_from(utc).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_zip_datetime_out_of_range_is_dos_epoch() {
        assert_eq!(zip_datetime(None), zip::DateTime::default());
        assert_eq!(zip_datetime(Some(0)), zip::DateTime::default());
        assert_eq!(zip_datetime(Some(u64::MAX)), zip::DateTime::default());

        let dt = zip_datetime(Some(1_700_000_000));
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.month(), 11);
        assert_eq!(dt.day(), 14);
        assert_eq!((dt.hour(), dt.minute()), (22, 13));

        let leap = zip_datetime(Some(951_782_400));
        assert_eq!((leap.year(), leap.month(), leap.day()), (2000, 2, 29));
    }

    #[test]
    fn test_store_and_deflate() {
        for level in [CompressionLevel::STORE, CompressionLevel::BEST] {
            let mut encoder = Box::new(ZipEncoder::new(level, None));
            let path = ArchivePath::new("a.txt").unwrap();
            encoder.append(&path, &[b'x'; 4096], None).unwrap();
            let bytes = encoder.finish().unwrap();

            let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
            let mut file = archive.by_name("a.txt").unwrap();
            let expected = if level.is_store() {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            assert_eq!(file.compression(), expected);
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            assert_eq!(content.len(), 4096);
        }
    }

    #[test]
    fn test_duplicate_path_is_rejected() {
        let mut encoder = ZipEncoder::new(CompressionLevel::DEFAULT, None);
        let path = ArchivePath::new("same.txt").unwrap();
        encoder.append(&path, b"one", None).unwrap();
        assert!(encoder.append(&path, b"two", None).is_err());
    }
}
