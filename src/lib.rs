//! # packsmith
//!
//! Archive-creation orchestration for client-side file tools.
//!
//! Given an ordered list of entries (a logical path plus a byte source), a
//! target container format and a few options, this crate produces one
//! downloadable buffer and a suggested file name, reporting every per-entry
//! status transition along the way. The container encodings themselves come
//! from the `zip`, `tar` and `flate2` crates.
//!
//! ## Quick Start
//!
//! ```rust
//! use packsmith::{ArchiveEntry, ArchiveFormat, ArchiveRequest, NoProgress, Result};
//! use packsmith::create_archive;
//!
//! fn main() -> Result<()> {
//!     let mut request = ArchiveRequest::new(ArchiveFormat::TarGz, "test").level(9)?;
//!     request.push(ArchiveEntry::from_bytes("a.txt", "hello")?);
//!     request.push(ArchiveEntry::from_bytes("dir/b.txt", "world")?);
//!
//!     let output = create_archive(&mut request, &mut NoProgress, None)?;
//!     assert_eq!(output.suggested_file_name, "test.tar.gz");
//!     Ok(())
//! }
//! ```
//!
//! ## Formats
//!
//! | Format | Extension | Compression level | Password |
//! |--------|-----------|-------------------|----------|
//! | ZIP | `.zip` | DEFLATE 1-9, STORE at 0 | AES-256 (feature `aes`) |
//! | TAR | `.tar` | ignored | ignored with a warning |
//! | TAR.GZ | `.tar.gz` | GZIP 0-9 over the whole TAR | ignored with a warning |
//!
//! ## Password-Protected ZIP
//!
//! Encryption needs an [`EncryptionEngine`], obtained once and passed to
//! every call:
//!
//! ```rust,ignore
//! use packsmith::{ArchiveEntry, ArchiveFormat, ArchiveRequest, EncryptionEngine, NoProgress};
//!
//! let engine = EncryptionEngine::initialize()?;
//! let mut request = ArchiveRequest::new(ArchiveFormat::Zip, "private").password("s3cret");
//! request.push(ArchiveEntry::from_file("report.pdf", "/tmp/report.pdf")?);
//! let output = packsmith::create_archive(&mut request, &mut NoProgress, Some(&engine))?;
//! ```
//!
//! Without an engine the call fails with [`Error::EngineNotReady`]; a blank
//! password fails with [`Error::InvalidInput`]. Neither touches any entry.
//!
//! ## Status Reporting
//!
//! Pass any [`StatusReporter`]. [`StatusLog`] records events, [`AtomicProgress`]
//! can be watched and cancelled from another thread, and [`status_fn`] wraps a
//! closure. With the `async` feature, [`create_archive_async`] reports through
//! an [`AsyncStatusCallback`] such as [`ChannelStatusReporter`].
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`]. Every [`Error`] maps to one
//! [`ErrorCode`] (`InvalidInput`, `ProcessingFailed`, `EngineNotReady` or
//! `Cancelled`) through [`Error::code`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `aes` | yes | AES-256 encrypted ZIP output |
//! | `async` | yes | Tokio-based [`create_archive_async`] |
//! | `cli` | no | The `packsmith` command-line tool |
//! | `wasm` | no | Browser bindings (`wasm32` only) |
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod archive_path;
pub mod crypto;
pub mod entry;
pub mod error;
pub mod format;
pub mod progress;
pub mod request;
pub mod write;

// Async API support (requires "async" feature)
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub mod async_options;

#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub mod async_write;

pub use archive_path::ArchivePath;
pub use crypto::{EncryptionEngine, Password};
pub use entry::{ArchiveEntry, EntrySource, EntryStatus, FileSource, MemorySource};
pub use error::{Error, ErrorCode, Result};
pub use format::{ArchiveFormat, FormatCapabilities};
pub use request::{ArchiveOutput, ArchiveRequest};
pub use write::{ArchiveOptions, CompressionLevel, create_archive};

pub use progress::{
    AtomicProgress, ClosureProgress, NoProgress, StatusEvent, StatusLog, StatusReporter,
    status_fn,
};

#[cfg(feature = "async")]
pub use async_options::{
    AsyncArchiveOptions, AsyncStatusCallback, CallbackFuture, ChannelStatusReporter,
};

#[cfg(feature = "async")]
pub use async_write::create_archive_async;

#[cfg(feature = "async")]
pub use tokio_util::sync::CancellationToken;

// WASM/Browser support (requires "wasm" feature)
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
#[cfg_attr(docsrs, doc(cfg(feature = "wasm")))]
pub mod wasm;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use wasm::{WasmArchiveBuilder, WasmArchiveOutput, preload_encryption};
