//! The seam between the orchestrator and the container libraries.

use crate::crypto::Password;
use crate::write::options::CompressionLevel;
use crate::write::tar_encoder::{TarEncoder, TarGzEncoder};
use crate::write::zip_encoder::ZipEncoder;
use crate::{ArchiveFormat, ArchivePath};
use std::io;

/// Incrementally builds one container in memory.
///
/// Implementations are moved between threads by the async orchestrator but
/// are never used from two threads at once.
pub(crate) trait ContainerEncoder: Send {
    /// Appends one regular file.
    ///
    /// `mtime` is seconds since the Unix epoch; `None` selects the
    /// encoder's fixed default.
    fn append(&mut self, path: &ArchivePath, data: &[u8], mtime: Option<u64>) -> io::Result<()>;

    /// Serializes the container and returns its bytes.
    fn finish(self: Box<Self>) -> io::Result<Vec<u8>>;
}

/// Creates the empty container for `format`.
///
/// `password` is only passed for ZIP requests that were cleared for
/// encryption.
pub(crate) fn build_encoder(
    format: ArchiveFormat,
    level: CompressionLevel,
    password: Option<&Password>,
) -> Box<dyn ContainerEncoder> {
    match format {
        ArchiveFormat::Zip => Box::new(ZipEncoder::new(level, password.cloned())),
        ArchiveFormat::Tar => Box::new(TarEncoder::new()),
        ArchiveFormat::TarGz => Box::new(TarGzEncoder::new(level)),
    }
}
