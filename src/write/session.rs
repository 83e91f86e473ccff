//! Status bookkeeping shared by the sync and async orchestrators.
//!
//! A [`Session`] validates a request, owns the counters of one run, and
//! applies each status transition to the request's entries. Every
//! transition yields the [`StatusEvent`]s the caller must deliver, so the
//! sync path can hand them to a `StatusReporter` and the async path to an
//! async callback without duplicating the state machine.

use crate::crypto::{EncryptionEngine, Password};
use crate::progress::{StatusEvent, overall_percent};
use crate::{ArchiveEntry, ArchiveFormat, ArchiveOptions, ArchiveOutput, ArchiveRequest};
use crate::{EntryStatus, Error, Result};
use std::collections::HashSet;

pub(crate) const BLANK_PASSWORD: &str = "Enter a password to encrypt the archive";

pub(crate) struct Session {
    format: ArchiveFormat,
    total: usize,
    completed: usize,
    input_bytes: u64,
    encrypt: bool,
    warnings: Vec<String>,
}

impl Session {
    /// Checks the request and resets its entries.
    ///
    /// Nothing about the request changes when this fails. Duplicate paths
    /// are rejected here for formats that cannot hold them, so the run
    /// never fails halfway on a conflict known up front.
    pub(crate) fn prepare(
        request: &mut ArchiveRequest,
        engine: Option<&EncryptionEngine>,
    ) -> Result<Self> {
        let format = request.format();
        let total = request.entries().len();
        if total == 0 {
            return Err(Error::InvalidInput(
                "Add at least one file to create an archive".into(),
            ));
        }

        let mut warnings = Vec::new();
        let encrypt = match &request.archive_options().password {
            Some(password) if format.capabilities().encryption => {
                if password.is_blank() {
                    return Err(Error::InvalidInput(BLANK_PASSWORD.into()));
                }
                if engine.is_none() {
                    return Err(Error::EngineNotReady);
                }
                true
            }
            Some(_) => {
                let message = format!("Password ignored: {} archives cannot be encrypted", format);
                log::warn!("{}", message);
                warnings.push(message);
                false
            }
            None => false,
        };

        if !format.capabilities().duplicates {
            let mut seen = HashSet::with_capacity(total);
            if let Some(entry) = request
                .entries()
                .iter()
                .find(|entry| !seen.insert(entry.path().as_str()))
            {
                return Err(Error::InvalidInput(format!(
                    "'{}' is added more than once; {} archives need unique paths",
                    entry.path(),
                    format
                )));
            }
        }

        let level = request.archive_options().level;
        if !format.capabilities().compression && level.get() != 0 {
            log::debug!("compression level {} has no effect on {} output", level, format);
        }

        for entry in request.entries_mut().iter_mut() {
            entry.reset();
        }

        log::debug!(
            "creating {} archive '{}' with {} entries",
            format,
            request.suggested_file_name(),
            total
        );

        Ok(Self {
            format,
            total,
            completed: 0,
            input_bytes: 0,
            encrypt,
            warnings,
        })
    }

    /// Password to hand to the encoder, if the output is encrypted.
    pub(crate) fn encoder_password<'a>(&self, options: &'a ArchiveOptions) -> Option<&'a Password> {
        if self.encrypt {
            options.password.as_ref()
        } else {
            None
        }
    }

    pub(crate) fn start_events(&mut self) -> Vec<StatusEvent> {
        let mut events = vec![StatusEvent::Start { total: self.total }];
        events.extend(
            self.warnings
                .drain(..)
                .map(|message| StatusEvent::Warning { message }),
        );
        events
    }

    /// Moves entry `index` to `Processing`.
    pub(crate) fn begin(&mut self, entries: &mut [ArchiveEntry], index: usize) -> Vec<StatusEvent> {
        log::debug!(
            "entry {} ({}): reading {}",
            index,
            entries[index].path(),
            entries[index].source().describe()
        );
        self.transition(entries, index, EntryStatus::Processing, 0)
    }

    /// Moves entry `index` to `Completed`.
    pub(crate) fn complete(
        &mut self,
        entries: &mut [ArchiveEntry],
        index: usize,
        size: usize,
    ) -> Vec<StatusEvent> {
        self.completed += 1;
        self.input_bytes += size as u64;
        self.transition(entries, index, EntryStatus::Completed, 100)
    }

    /// Moves entry `index` to `Error` and builds the error to return.
    pub(crate) fn fail(
        &mut self,
        entries: &mut [ArchiveEntry],
        index: usize,
        cause: impl std::fmt::Display,
    ) -> (Error, Vec<StatusEvent>) {
        let error = Error::entry_failed(index, entries[index].path().as_str(), cause);
        log::warn!("{}", error);
        let progress = entries[index].progress();
        let events = self.transition(entries, index, EntryStatus::Error, progress);
        (error, events)
    }

    /// Logs a cancellation before entry `index`.
    pub(crate) fn cancelled(&self, index: usize) -> Error {
        log::info!(
            "archive creation cancelled before entry {} of {}",
            index,
            self.total
        );
        Error::Cancelled
    }

    pub(crate) fn finalize_event(&self) -> StatusEvent {
        log::debug!("finalizing {} container", self.format);
        StatusEvent::Finalize {
            format: self.format,
        }
    }

    pub(crate) fn output(&self, bytes: Vec<u8>, request: &ArchiveRequest) -> ArchiveOutput {
        let output = ArchiveOutput {
            suggested_file_name: request.suggested_file_name(),
            format: self.format,
            entries_written: self.completed,
            input_bytes: self.input_bytes,
            bytes,
        };
        log::info!(
            "created {} ({} entries, {} bytes)",
            output.suggested_file_name,
            output.entries_written,
            output.bytes.len()
        );
        output
    }

    fn transition(
        &mut self,
        entries: &mut [ArchiveEntry],
        index: usize,
        status: EntryStatus,
        progress: u8,
    ) -> Vec<StatusEvent> {
        let entry = &mut entries[index];
        entry.set_state(status, progress);
        vec![
            StatusEvent::Status {
                index,
                path: entry.path().clone(),
                status,
                progress,
            },
            StatusEvent::Overall {
                completed: self.completed,
                total: self.total,
                percent: overall_percent(self.completed, self.total),
            },
        ]
    }
}
