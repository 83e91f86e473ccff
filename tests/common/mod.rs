//! Shared test utilities for integration tests.
//!
//! Helpers here build requests and read finished containers back with the
//! same crates the encoders use, so tests can compare entry names and bytes.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use packsmith::{ArchiveEntry, ArchiveFormat, ArchiveRequest, EntrySource};
use std::io::{self, Cursor, Read};

/// Builds a request with in-memory entries.
pub fn request(format: ArchiveFormat, name: &str, entries: &[(&str, &[u8])]) -> ArchiveRequest {
    let mut request = ArchiveRequest::new(format, name);
    for (path, data) in entries {
        request.push(ArchiveEntry::from_bytes(path, data.to_vec()).expect("valid test path"));
    }
    request
}

/// Reads every entry of a ZIP archive as `(name, bytes)` in stored order.
pub fn read_zip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    read_zip_with(bytes, None)
}

/// Reads a ZIP archive, decrypting entries with `password` when given.
pub fn read_zip_with(bytes: &[u8], password: Option<&str>) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    (0..archive.len())
        .map(|i| {
            let mut file = match password {
                Some(p) => archive.by_index_decrypt(i, p.as_bytes()).expect("decrypt"),
                None => archive.by_index(i).expect("entry"),
            };
            let mut data = Vec::new();
            file.read_to_end(&mut data).expect("read entry");
            (file.name().to_string(), data)
        })
        .collect()
}

/// Reads every entry of a TAR archive as `(name, bytes)` in stored order.
pub fn read_tar(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = tar::Archive::new(Cursor::new(bytes));
    archive
        .entries()
        .expect("valid tar")
        .map(|entry| {
            let mut entry = entry.expect("tar entry");
            let name = entry
                .path()
                .expect("tar path")
                .to_string_lossy()
                .replace('\\', "/");
            let mut data = Vec::new();
            entry.read_to_end(&mut data).expect("read tar entry");
            (name, data)
        })
        .collect()
}

/// Decompresses a gzip stream.
pub fn gunzip(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .expect("valid gzip");
    out
}

/// Reads any supported container back.
pub fn read_any(format: ArchiveFormat, bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    match format {
        ArchiveFormat::Zip => read_zip(bytes),
        ArchiveFormat::Tar => read_tar(bytes),
        ArchiveFormat::TarGz => read_tar(&gunzip(bytes)),
    }
}

/// A source whose read always fails, for failure-path tests.
#[derive(Debug)]
pub struct FailingSource {
    pub message: &'static str,
}

impl EntrySource for FailingSource {
    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, self.message))
    }

    fn describe(&self) -> String {
        "failing source".to_string()
    }
}
