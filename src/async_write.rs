//! Async archive creation using Tokio.
//!
//! [`create_archive_async`] has the same contract as
//! [`create_archive`](crate::create_archive) but never blocks the runtime:
//! source reads, appends and the final serialization run on the blocking
//! thread pool. The single container encoder is moved into each blocking
//! task and handed back afterwards, so it is never shared.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use packsmith::{ArchiveEntry, ArchiveFormat, ArchiveRequest};
//! use packsmith::{AsyncArchiveOptions, ChannelStatusReporter, create_archive_async};
//!
//! #[tokio::main]
//! async fn main() -> packsmith::Result<()> {
//!     let mut request = ArchiveRequest::new(ArchiveFormat::TarGz, "logs").level(9)?;
//!     request.push(ArchiveEntry::from_file("app.log", "/var/log/app.log")?);
//!
//!     let (reporter, mut events) = ChannelStatusReporter::new(64);
//!     tokio::spawn(async move {
//!         while let Some(event) = events.recv().await {
//!             println!("{:?}", event);
//!         }
//!     });
//!
//!     let options = AsyncArchiveOptions::new().progress(Arc::new(reporter));
//!     let output = create_archive_async(&mut request, None, &options).await?;
//!     tokio::fs::write(&output.suggested_file_name, &output.bytes).await?;
//!     Ok(())
//! }
//! ```

use std::io;
use std::sync::Arc;

use crate::async_options::AsyncArchiveOptions;
use crate::crypto::EncryptionEngine;
use crate::entry::EntrySource;
use crate::write::session::Session;
use crate::write::{ContainerEncoder, build_encoder};
use crate::{ArchiveOptions, ArchiveOutput, ArchivePath, ArchiveRequest, Error, Result};

/// Creates an archive without blocking the async runtime.
///
/// Status events go to `options.progress`; `options.cancel_token` is
/// checked before each entry.
///
/// # Errors
///
/// The same as [`create_archive`](crate::create_archive).
pub async fn create_archive_async(
    request: &mut ArchiveRequest,
    engine: Option<&EncryptionEngine>,
    options: &AsyncArchiveOptions,
) -> Result<ArchiveOutput> {
    let mut session = Session::prepare(request, engine)?;
    for event in session.start_events() {
        options.deliver(&event).await;
    }

    let (format, archive_options, entries) = request.parts_mut();
    let mut encoder = build_encoder(
        format,
        archive_options.level,
        session.encoder_password(archive_options),
    );

    for index in 0..entries.len() {
        if options.is_cancelled() {
            return Err(session.cancelled(index));
        }
        for event in session.begin(entries, index) {
            options.deliver(&event).await;
        }

        let source = Arc::clone(entries[index].source());
        let path = entries[index].path().clone();
        let entry_options = archive_options.clone();
        let joined = run_blocking(move || {
            let result = append_entry(encoder.as_mut(), source.as_ref(), &path, &entry_options);
            (encoder, result)
        })
        .await;
        let appended = match joined {
            Ok((returned, appended)) => {
                encoder = returned;
                appended
            }
            // The worker panicked and took the encoder with it.
            Err(e) => {
                let (error, events) = session.fail(entries, index, e);
                for event in events {
                    options.deliver(&event).await;
                }
                return Err(error);
            }
        };

        match appended {
            Ok(size) => {
                for event in session.complete(entries, index, size) {
                    options.deliver(&event).await;
                }
            }
            Err(e) => {
                let (error, events) = session.fail(entries, index, e);
                for event in events {
                    options.deliver(&event).await;
                }
                return Err(error);
            }
        }
    }

    options.deliver(&session.finalize_event()).await;
    let bytes = run_blocking(move || encoder.finish())
        .await
        .map_err(Error::Io)?
        .map_err(|e| {
            log::warn!("finalizing {} container failed: {}", format, e);
            Error::finalize_failed(e)
        })?;

    Ok(session.output(bytes, request))
}

fn append_entry(
    encoder: &mut dyn ContainerEncoder,
    source: &dyn EntrySource,
    path: &ArchivePath,
    options: &ArchiveOptions,
) -> io::Result<usize> {
    let data = source.read_bytes()?;
    encoder.append(path, &data, options.entry_mtime(source.modified()))?;
    Ok(data.len())
}

async fn run_blocking<T, F>(f: F) -> io::Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(io::Error::other)
}
