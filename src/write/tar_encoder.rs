//! TAR and TAR.GZ output through the `tar` and `flate2` crates.

use super::encoder::ContainerEncoder;
use crate::ArchivePath;
use crate::write::options::CompressionLevel;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::{self, Write};
use tar::{Builder, EntryType, Header};

/// Appends regular files with GNU headers (mode 0644, owner 0:0).
pub(crate) struct TarEncoder {
    builder: Builder<Vec<u8>>,
}

impl TarEncoder {
    pub(crate) fn new() -> Self {
        Self {
            builder: Builder::new(Vec::new()),
        }
    }

    fn into_bytes(self) -> io::Result<Vec<u8>> {
        self.builder.into_inner()
    }
}

impl ContainerEncoder for TarEncoder {
    fn append(&mut self, path: &ArchivePath, data: &[u8], mtime: Option<u64>) -> io::Result<()> {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_uid(0);
        header.set_gid(0);
        header.set_mtime(mtime.unwrap_or(0));
        self.builder.append_data(&mut header, path.as_str(), data)
    }

    fn finish(self: Box<Self>) -> io::Result<Vec<u8>> {
        self.into_bytes()
    }
}

/// Builds a TAR in memory, then compresses the whole buffer as one GZIP
/// member.
pub(crate) struct TarGzEncoder {
    tar: TarEncoder,
    level: CompressionLevel,
}

impl TarGzEncoder {
    pub(crate) fn new(level: CompressionLevel) -> Self {
        Self {
            tar: TarEncoder::new(),
            level,
        }
    }
}

impl ContainerEncoder for TarGzEncoder {
    fn append(&mut self, path: &ArchivePath, data: &[u8], mtime: Option<u64>) -> io::Result<()> {
        self.tar.append(path, data, mtime)
    }

    fn finish(self: Box<Self>) -> io::Result<Vec<u8>> {
        let Self { tar, level } = *self;
        let tar_bytes = tar.into_bytes()?;
        let mut gz = GzEncoder::new(
            Vec::with_capacity(tar_bytes.len() / 2),
            Compression::new(level.get()),
        );
        gz.write_all(&tar_bytes)?;
        gz.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn entries(bytes: &[u8]) -> Vec<(String, Vec<u8>, u32, u64)> {
        let mut archive = tar::Archive::new(bytes);
        archive
            .entries()
            .unwrap()
            .map(|e| {
                let mut e = e.unwrap();
                let path = e.path().unwrap().to_string_lossy().into_owned();
                let mode = e.header().mode().unwrap();
                let mtime = e.header().mtime().unwrap();
                let mut data = Vec::new();
                e.read_to_end(&mut data).unwrap();
                (path, data, mode, mtime)
            })
            .collect()
    }

    #[test]
    fn test_tar_headers() {
        let mut encoder = Box::new(TarEncoder::new());
        encoder
            .append(&ArchivePath::new("a.txt").unwrap(), b"hello", Some(1_700_000_000))
            .unwrap();
        encoder
            .append(&ArchivePath::new("dir/b.txt").unwrap(), b"world", None)
            .unwrap();
        let bytes = encoder.finish().unwrap();
        assert_eq!(bytes.len() % 512, 0);

        let found = entries(&bytes);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], ("a.txt".into(), b"hello".to_vec(), 0o644, 1_700_000_000));
        assert_eq!(found[1], ("dir/b.txt".into(), b"world".to_vec(), 0o644, 0));
    }

    #[test]
    fn test_tar_keeps_duplicates_and_long_names() {
        let long = format!("{}/file.txt", "d".repeat(150));
        let mut encoder = Box::new(TarEncoder::new());
        for path in ["x.txt", "x.txt", long.as_str()] {
            encoder
                .append(&ArchivePath::new(path).unwrap(), b"1", None)
                .unwrap();
        }
        let names: Vec<_> = entries(&encoder.finish().unwrap())
            .into_iter()
            .map(|e| e.0)
            .collect();
        assert_eq!(names, vec!["x.txt".to_string(), "x.txt".to_string(), long]);
    }

    #[test]
    fn test_tar_gz_wraps_tar() {
        let path = ArchivePath::new("a.txt").unwrap();

        let mut plain = Box::new(TarEncoder::new());
        plain.append(&path, b"hello", None).unwrap();
        let tar_bytes = plain.finish().unwrap();

        let mut gz = Box::new(TarGzEncoder::new(CompressionLevel::BEST));
        gz.append(&path, b"hello", None).unwrap();
        let gz_bytes = gz.finish().unwrap();
        assert_eq!(&gz_bytes[..2], &[0x1f, 0x8b]);

        let mut decoded = Vec::new();
        GzDecoder::new(gz_bytes.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, tar_bytes);
    }
}
