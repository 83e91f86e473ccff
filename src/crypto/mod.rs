//! AES-256 encryption readiness for ZIP output.
//!
//! Encrypted ZIP entries are produced by the `zip` crate (WinZip AE-2,
//! AES-256). Before an encrypted archive can be requested, the caller
//! obtains an [`EncryptionEngine`]: a proof that the AES backend is compiled
//! in and works on this platform. The engine is a plain value held by the
//! caller; there is no global readiness flag.
//!
//! ```rust,no_run
//! use packsmith::{ArchiveEntry, ArchiveFormat, ArchiveRequest, EncryptionEngine, NoProgress};
//! use packsmith::create_archive;
//!
//! let engine = EncryptionEngine::initialize()?;
//!
//! let mut request = ArchiveRequest::new(ArchiveFormat::Zip, "secret")
//!     .password("correct horse");
//! request.push(ArchiveEntry::from_bytes("notes.txt", "hi")?);
//!
//! let output = create_archive(&mut request, &mut NoProgress, Some(&engine))?;
//! assert_eq!(output.suggested_file_name, "secret.zip");
//! # Ok::<(), packsmith::Error>(())
//! ```

mod password;

pub use password::Password;

use crate::Result;

/// Initialized AES-256 encryption capability.
///
/// Obtain one with [`EncryptionEngine::initialize`] (or
/// `EncryptionEngine::preload` in async code) and pass it to the
/// orchestrator. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct EncryptionEngine {
    _ready: (),
}

impl EncryptionEngine {
    /// Probe content encrypted during the self-check.
    #[cfg(feature = "aes")]
    const PROBE: &'static [u8] = b"packsmith encryption self-check";

    /// Runs the one-time self-check and returns a ready engine.
    ///
    /// The check writes a small AES-256 ZIP entry into memory and reads it
    /// back with the probe password.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnsupportedFeature`] when the crate was built
    /// without the `aes` feature, or [`crate::Error::ProcessingFailed`] if the
    /// probe does not round-trip.
    #[cfg(feature = "aes")]
    pub fn initialize() -> Result<Self> {
        self_check()?;
        log::debug!("AES-256 encryption engine ready");
        Ok(Self { _ready: () })
    }

    /// Runs the one-time self-check and returns a ready engine.
    ///
    /// # Errors
    ///
    /// Always returns [`crate::Error::UnsupportedFeature`]: the crate was
    /// built without the `aes` feature.
    #[cfg(not(feature = "aes"))]
    pub fn initialize() -> Result<Self> {
        Err(crate::Error::UnsupportedFeature { feature: "aes" })
    }

    /// Async variant of [`initialize`](Self::initialize).
    ///
    /// The self-check runs on the blocking thread pool so the runtime is not
    /// stalled while the key derivation runs.
    #[cfg(feature = "async")]
    pub async fn preload() -> Result<Self> {
        tokio::task::spawn_blocking(Self::initialize)
            .await
            .map_err(|e| crate::Error::Io(std::io::Error::other(e)))?
    }

    /// Returns true if this build can produce encrypted archives.
    pub fn is_supported() -> bool {
        cfg!(feature = "aes")
    }
}

#[cfg(feature = "aes")]
fn self_check() -> Result<()> {
    use std::io::{Cursor, Read, Write};
    use zip::write::SimpleFileOptions;
    use zip::{AesMode, CompressionMethod, ZipArchive, ZipWriter};

    const PROBE_PASSWORD: &str = "probe";
    let fail = |e: &dyn std::fmt::Display| {
        crate::Error::finalize_failed(format!("encryption self-check failed: {}", e))
    };

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .with_aes_encryption(AesMode::Aes256, PROBE_PASSWORD);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file("probe", options).map_err(|e| fail(&e))?;
    writer
        .write_all(EncryptionEngine::PROBE)
        .map_err(|e| fail(&e))?;
    let cursor = writer.finish().map_err(|e| fail(&e))?;

    let mut archive = ZipArchive::new(cursor).map_err(|e| fail(&e))?;
    let mut file = archive
        .by_name_decrypt("probe", PROBE_PASSWORD.as_bytes())
        .map_err(|e| fail(&e))?;
    if !file.encrypted() {
        return Err(fail(&"probe entry was not encrypted"));
    }
    let mut decrypted = Vec::new();
    file.read_to_end(&mut decrypted).map_err(|e| fail(&e))?;
    if decrypted != EncryptionEngine::PROBE {
        return Err(fail(&"probe content mismatch"));
    }
    Ok(())
}
