//! Archive creation.
//!
//! [`create_archive`] walks the request's entries in order, reads each
//! source, appends it to the container for the requested format and
//! reports every status transition. The finished container is returned as
//! one buffer together with the file name it should be saved under.
//!
//! # Example
//!
//! ```rust
//! use packsmith::{ArchiveEntry, ArchiveFormat, ArchiveRequest, EntryStatus, StatusLog};
//! use packsmith::create_archive;
//!
//! let mut request = ArchiveRequest::new(ArchiveFormat::Zip, "test").level(6)?;
//! request.push(ArchiveEntry::from_bytes("a.txt", "hello")?);
//! request.push(ArchiveEntry::from_bytes("dir/b.txt", "world")?);
//!
//! let mut log = StatusLog::new();
//! let output = create_archive(&mut request, &mut log, None)?;
//!
//! assert_eq!(output.suggested_file_name, "test.zip");
//! assert_eq!(output.entries_written, 2);
//! assert!(request.entries().iter().all(|e| e.status() == EntryStatus::Completed));
//! # Ok::<(), packsmith::Error>(())
//! ```
//!
//! # Failure
//!
//! The first read or append failure stops the run. The entry in flight is
//! left in [`EntryStatus::Error`](crate::EntryStatus::Error), entries after
//! it stay `Pending`, and no partial archive is returned. Calling again with
//! the same request resets every entry and starts over.

mod encoder;
pub(crate) mod options;
pub(crate) mod session;
mod tar_encoder;
mod zip_encoder;

pub(crate) use encoder::{ContainerEncoder, build_encoder};
pub use options::{ArchiveOptions, CompressionLevel};

use crate::crypto::EncryptionEngine;
use crate::progress::StatusReporter;
use crate::{ArchiveOutput, ArchiveRequest, Error, Result};
use session::Session;

/// Creates an archive from `request`, reporting progress to `reporter`.
///
/// `engine` is required only for password-protected ZIP output.
///
/// # Errors
///
/// - [`Error::InvalidInput`] if the request has no entries or a ZIP password
///   is blank; no entry changes status.
/// - [`Error::EngineNotReady`] if a ZIP password is set and `engine` is `None`.
/// - [`Error::ProcessingFailed`] if a source cannot be read, an entry cannot
///   be written, or the container cannot be finalized.
/// - [`Error::Cancelled`] if the reporter requested cancellation.
pub fn create_archive<R>(
    request: &mut ArchiveRequest,
    reporter: &mut R,
    engine: Option<&EncryptionEngine>,
) -> Result<ArchiveOutput>
where
    R: StatusReporter + ?Sized,
{
    let mut session = Session::prepare(request, engine)?;
    for event in session.start_events() {
        event.deliver(reporter);
    }

    let (format, options, entries) = request.parts_mut();
    let mut encoder = build_encoder(format, options.level, session.encoder_password(options));

    for index in 0..entries.len() {
        if reporter.should_cancel() {
            return Err(session.cancelled(index));
        }
        for event in session.begin(entries, index) {
            event.deliver(reporter);
        }

        let source = entries[index].source();
        let appended = source.read_bytes().and_then(|data| {
            let mtime = options.entry_mtime(source.modified());
            encoder
                .append(entries[index].path(), &data, mtime)
                .map(|()| data.len())
        });

        match appended {
            Ok(size) => {
                for event in session.complete(entries, index, size) {
                    event.deliver(reporter);
                }
            }
            Err(e) => {
                let (error, events) = session.fail(entries, index, e);
                for event in events {
                    event.deliver(reporter);
                }
                return Err(error);
            }
        }
    }

    session.finalize_event().deliver(reporter);
    let bytes = encoder.finish().map_err(|e| {
        log::warn!("finalizing {} container failed: {}", format, e);
        Error::finalize_failed(e)
    })?;

    Ok(session.output(bytes, request))
}
