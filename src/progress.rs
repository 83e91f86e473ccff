//! Status and progress reporting for archive creation.
//!
//! The orchestrator reports through a [`StatusReporter`]:
//! - every per-entry status transition (`Pending -> Processing -> Completed | Error`)
//! - overall progress, recomputed after each transition
//! - the moment the container is serialized
//! - warnings about ignored options
//!
//! It also polls [`StatusReporter::should_cancel`] before each entry.
//!
//! # Example
//!
//! ```rust
//! use packsmith::progress::status_fn;
//! use packsmith::{ArchiveEntry, ArchiveFormat, ArchiveRequest, EntryStatus, create_archive};
//!
//! let mut request = ArchiveRequest::new(ArchiveFormat::Tar, "demo");
//! request.push(ArchiveEntry::from_bytes("a.txt", "hello")?);
//!
//! let mut done = 0;
//! let mut reporter = status_fn(|_index, status, _progress| {
//!     if status == EntryStatus::Completed {
//!         done += 1;
//!     }
//! });
//! create_archive(&mut request, &mut reporter, None)?;
//! drop(reporter);
//! assert_eq!(done, 1);
//! # Ok::<(), packsmith::Error>(())
//! ```

use crate::{ArchiveFormat, ArchivePath, EntryStatus};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

const BYTES_KB: f64 = 1024.0;
const BYTES_MB: f64 = BYTES_KB * 1024.0;
const BYTES_GB: f64 = BYTES_MB * 1024.0;

/// Receives status updates while an archive is being created.
///
/// All methods have no-op defaults, so implementors only override what they
/// display. Callbacks for entry *i* always finish before entry *i + 1*
/// starts.
pub trait StatusReporter: Send {
    /// Called once, after the request passed its checks.
    fn on_start(&mut self, total_entries: usize) {
        let _ = total_entries;
    }

    /// Called on every status transition of an entry.
    fn on_status(&mut self, index: usize, path: &ArchivePath, status: EntryStatus, progress: u8) {
        let _ = (index, path, status, progress);
    }

    /// Called after each transition with the overall completion.
    ///
    /// `percent` is `completed / total * 100`, rounded down.
    fn on_overall(&mut self, completed: usize, total: usize, percent: u8) {
        let _ = (completed, total, percent);
    }

    /// Called after the last entry, before the container is serialized.
    fn on_finalize(&mut self, format: ArchiveFormat) {
        let _ = format;
    }

    /// Called when an option is ignored or something else deserves a notice.
    fn on_warning(&mut self, message: &str) {
        let _ = message;
    }

    /// Checked before each entry; returning `true` stops the run.
    fn should_cancel(&self) -> bool {
        false
    }
}

impl<R: StatusReporter + ?Sized> StatusReporter for &mut R {
    fn on_start(&mut self, total_entries: usize) {
        (**self).on_start(total_entries)
    }

    fn on_status(&mut self, index: usize, path: &ArchivePath, status: EntryStatus, progress: u8) {
        (**self).on_status(index, path, status, progress)
    }

    fn on_overall(&mut self, completed: usize, total: usize, percent: u8) {
        (**self).on_overall(completed, total, percent)
    }

    fn on_finalize(&mut self, format: ArchiveFormat) {
        (**self).on_finalize(format)
    }

    fn on_warning(&mut self, message: &str) {
        (**self).on_warning(message)
    }

    fn should_cancel(&self) -> bool {
        (**self).should_cancel()
    }
}

/// Overall completion in percent, rounded down. An empty run is 0%.
pub fn overall_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        (completed.min(total) * 100 / total) as u8
    }
}

/// A reporter that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl StatusReporter for NoProgress {}

/// One reported event, as recorded by [`StatusLog`] or sent over a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// The run started.
    Start {
        /// Number of entries in the request.
        total: usize,
    },
    /// An entry changed status.
    Status {
        /// Index of the entry in the request.
        index: usize,
        /// Archive path of the entry.
        path: ArchivePath,
        /// New status.
        status: EntryStatus,
        /// Progress, 0 to 100.
        progress: u8,
    },
    /// Overall progress changed.
    Overall {
        /// Entries completed so far.
        completed: usize,
        /// Total entries.
        total: usize,
        /// Completion in percent.
        percent: u8,
    },
    /// The container is being serialized.
    Finalize {
        /// Format being written.
        format: ArchiveFormat,
    },
    /// A warning.
    Warning {
        /// Warning text.
        message: String,
    },
}

impl StatusEvent {
    /// Hands this event to the matching reporter method.
    pub fn deliver<R: StatusReporter + ?Sized>(&self, reporter: &mut R) {
        match self {
            Self::Start { total } => reporter.on_start(*total),
            Self::Status {
                index,
                path,
                status,
                progress,
            } => reporter.on_status(*index, path, *status, *progress),
            Self::Overall {
                completed,
                total,
                percent,
            } => reporter.on_overall(*completed, *total, *percent),
            Self::Finalize { format } => reporter.on_finalize(*format),
            Self::Warning { message } => reporter.on_warning(message),
        }
    }
}

/// A reporter that records every event in order.
#[derive(Debug, Default, Clone)]
pub struct StatusLog {
    events: Vec<StatusEvent>,
    cancel_before: Option<usize>,
    started: usize,
}

impl StatusLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation once `index` entries have been started.
    ///
    /// Mostly useful in tests.
    pub fn cancel_before(mut self, index: usize) -> Self {
        self.cancel_before = Some(index);
        self
    }

    /// All recorded events.
    pub fn events(&self) -> &[StatusEvent] {
        &self.events
    }

    /// Status sequence observed for one entry.
    pub fn statuses_for(&self, index: usize) -> Vec<EntryStatus> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StatusEvent::Status {
                    index: i, status, ..
                } if *i == index => Some(*status),
                _ => None,
            })
            .collect()
    }

    /// Overall percentages in the order they were reported.
    pub fn overall_percents(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StatusEvent::Overall { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect()
    }

    /// Recorded warnings.
    pub fn warnings(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StatusEvent::Warning { message } => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// True if the run reached the finalize step.
    pub fn finalized(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, StatusEvent::Finalize { .. }))
    }
}

impl StatusReporter for StatusLog {
    fn on_start(&mut self, total_entries: usize) {
        self.started = 0;
        self.events.push(StatusEvent::Start {
            total: total_entries,
        });
    }

    fn on_status(&mut self, index: usize, path: &ArchivePath, status: EntryStatus, progress: u8) {
        if status == EntryStatus::Processing {
            self.started += 1;
        }
        self.events.push(StatusEvent::Status {
            index,
            path: path.clone(),
            status,
            progress,
        });
    }

    fn on_overall(&mut self, completed: usize, total: usize, percent: u8) {
        self.events.push(StatusEvent::Overall {
            completed,
            total,
            percent,
        });
    }

    fn on_finalize(&mut self, format: ArchiveFormat) {
        self.events.push(StatusEvent::Finalize { format });
    }

    fn on_warning(&mut self, message: &str) {
        self.events.push(StatusEvent::Warning {
            message: message.to_string(),
        });
    }

    fn should_cancel(&self) -> bool {
        self.cancel_before.is_some_and(|k| self.started >= k)
    }
}

/// A thread-safe reporter using atomics.
///
/// Lets another thread watch progress and request cancellation.
#[derive(Debug)]
pub struct AtomicProgress {
    total: AtomicUsize,
    completed: AtomicUsize,
    current: AtomicUsize,
    cancelled: AtomicBool,
    start_time: Instant,
}

impl Default for AtomicProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomicProgress {
    /// Creates a new atomic reporter.
    pub fn new() -> Self {
        Self {
            total: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            current: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
            start_time: Instant::now(),
        }
    }

    /// Creates a shared atomic reporter.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Total entries of the current run.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Entries completed so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Index of the entry most recently started.
    pub fn current_index(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    /// Returns whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Requests cancellation before the next entry.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Overall completion in percent.
    pub fn percent(&self) -> u8 {
        overall_percent(self.completed(), self.total())
    }

    /// Time since creation.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn record_start(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.completed.store(0, Ordering::Relaxed);
    }

    fn record_status(&self, index: usize, status: EntryStatus) {
        if status == EntryStatus::Processing {
            self.current.store(index, Ordering::Relaxed);
        }
    }

    fn record_overall(&self, completed: usize) {
        self.completed.store(completed, Ordering::Relaxed);
    }
}

impl StatusReporter for AtomicProgress {
    fn on_start(&mut self, total_entries: usize) {
        self.record_start(total_entries);
    }

    fn on_status(&mut self, index: usize, _path: &ArchivePath, status: EntryStatus, _progress: u8) {
        self.record_status(index, status);
    }

    fn on_overall(&mut self, completed: usize, _total: usize, _percent: u8) {
        self.record_overall(completed);
    }

    fn should_cancel(&self) -> bool {
        self.is_cancelled()
    }
}

/// Reporter for a shared `Arc<AtomicProgress>`.
impl StatusReporter for Arc<AtomicProgress> {
    fn on_start(&mut self, total_entries: usize) {
        self.record_start(total_entries);
    }

    fn on_status(&mut self, index: usize, _path: &ArchivePath, status: EntryStatus, _progress: u8) {
        self.record_status(index, status);
    }

    fn on_overall(&mut self, completed: usize, _total: usize, _percent: u8) {
        self.record_overall(completed);
    }

    fn should_cancel(&self) -> bool {
        self.is_cancelled()
    }
}

/// A reporter that calls a closure on every status transition.
pub struct ClosureProgress<F> {
    callback: F,
}

impl<F> ClosureProgress<F>
where
    F: FnMut(usize, EntryStatus, u8) + Send,
{
    /// Creates a reporter from a closure.
    ///
    /// The closure receives `(index, status, progress)`.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> StatusReporter for ClosureProgress<F>
where
    F: FnMut(usize, EntryStatus, u8) + Send,
{
    fn on_status(&mut self, index: usize, _path: &ArchivePath, status: EntryStatus, progress: u8) {
        (self.callback)(index, status, progress)
    }
}

/// Creates a closure-based reporter.
pub fn status_fn<F>(f: F) -> ClosureProgress<F>
where
    F: FnMut(usize, EntryStatus, u8) + Send,
{
    ClosureProgress::new(f)
}

/// Formats bytes as a human-readable string using IEC units (KiB, MiB, GiB).
///
/// ```rust
/// use packsmith::progress::format_bytes_iec;
///
/// assert_eq!(format_bytes_iec(512), "512 B");
/// assert_eq!(format_bytes_iec(1536), "1.5 KiB");
/// assert_eq!(format_bytes_iec(1048576), "1.0 MiB");
/// ```
pub fn format_bytes_iec(bytes: u64) -> String {
    let bytes_f64 = bytes as f64;
    if bytes_f64 < BYTES_KB {
        format!("{} B", bytes)
    } else if bytes_f64 < BYTES_MB {
        format!("{:.1} KiB", bytes_f64 / BYTES_KB)
    } else if bytes_f64 < BYTES_GB {
        format!("{:.1} MiB", bytes_f64 / BYTES_MB)
    } else {
        format!("{:.1} GiB", bytes_f64 / BYTES_GB)
    }
}

/// Formats a duration as a human-readable string.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 1 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
