//! Async-specific options for archive creation.
//!
//! This module provides cancellation and async status callbacks for
//! [`create_archive_async`](crate::create_archive_async).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::progress::StatusEvent;
use crate::{ArchiveFormat, ArchivePath, EntryStatus};

/// Boxed future returned by [`AsyncStatusCallback`] methods.
pub type CallbackFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Async status callback for archive creation.
///
/// Unlike the sync [`StatusReporter`](crate::StatusReporter), the methods may
/// await, e.g. to push updates to a UI task. The orchestrator awaits each
/// callback before moving on, so events arrive in order.
pub trait AsyncStatusCallback: Send + Sync {
    /// Called once, after the request passed its checks.
    fn on_start(&self, total_entries: usize) -> CallbackFuture<'_> {
        let _ = total_entries;
        Box::pin(async {})
    }

    /// Called on every status transition of an entry.
    fn on_status(
        &self,
        index: usize,
        path: &ArchivePath,
        status: EntryStatus,
        progress: u8,
    ) -> CallbackFuture<'_>;

    /// Called after each transition with the overall completion.
    fn on_overall(&self, completed: usize, total: usize, percent: u8) -> CallbackFuture<'_> {
        let _ = (completed, total, percent);
        Box::pin(async {})
    }

    /// Called before the container is serialized.
    fn on_finalize(&self, format: ArchiveFormat) -> CallbackFuture<'_> {
        let _ = format;
        Box::pin(async {})
    }

    /// Called when an option is ignored.
    fn on_warning(&self, message: &str) -> CallbackFuture<'_> {
        let _ = message;
        Box::pin(async {})
    }
}

/// Options for async archive creation.
#[derive(Default, Clone)]
pub struct AsyncArchiveOptions {
    /// Cancellation token, checked before each entry.
    pub cancel_token: Option<CancellationToken>,
    /// Async status callback (optional).
    pub progress: Option<Arc<dyn AsyncStatusCallback>>,
}

impl std::fmt::Debug for AsyncArchiveOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncArchiveOptions")
            .field("has_cancel_token", &self.cancel_token.is_some())
            .field("has_progress", &self.progress.is_some())
            .finish()
    }
}

impl AsyncArchiveOptions {
    /// Creates options without cancellation or callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cancellation token for graceful cancellation.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Sets the async status callback.
    pub fn progress(mut self, callback: Arc<dyn AsyncStatusCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Returns true if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token
            .as_ref()
            .is_some_and(|t| t.is_cancelled())
    }

    pub(crate) async fn deliver(&self, event: &StatusEvent) {
        let Some(callback) = &self.progress else {
            return;
        };
        match event {
            StatusEvent::Start { total } => callback.on_start(*total).await,
            StatusEvent::Status {
                index,
                path,
                status,
                progress,
            } => callback.on_status(*index, path, *status, *progress).await,
            StatusEvent::Overall {
                completed,
                total,
                percent,
            } => callback.on_overall(*completed, *total, *percent).await,
            StatusEvent::Finalize { format } => callback.on_finalize(*format).await,
            StatusEvent::Warning { message } => callback.on_warning(message).await,
        }
    }
}

/// A channel-based status callback.
///
/// Every event is sent as a [`StatusEvent`] through a tokio mpsc channel. A
/// full channel applies backpressure to the orchestrator; a dropped
/// receiver is ignored.
pub struct ChannelStatusReporter {
    sender: tokio::sync::mpsc::Sender<StatusEvent>,
}

impl ChannelStatusReporter {
    /// Creates a new channel-based reporter.
    ///
    /// Returns a tuple of (reporter, receiver).
    pub fn new(buffer_size: usize) -> (Self, tokio::sync::mpsc::Receiver<StatusEvent>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer_size);
        (Self { sender: tx }, rx)
    }

    fn send(&self, event: StatusEvent) -> CallbackFuture<'_> {
        Box::pin(async move {
            let _ = self.sender.send(event).await;
        })
    }
}

impl AsyncStatusCallback for ChannelStatusReporter {
    fn on_start(&self, total_entries: usize) -> CallbackFuture<'_> {
        self.send(StatusEvent::Start {
            total: total_entries,
        })
    }

    fn on_status(
        &self,
        index: usize,
        path: &ArchivePath,
        status: EntryStatus,
        progress: u8,
    ) -> CallbackFuture<'_> {
        self.send(StatusEvent::Status {
            index,
            path: path.clone(),
            status,
            progress,
        })
    }

    fn on_overall(&self, completed: usize, total: usize, percent: u8) -> CallbackFuture<'_> {
        self.send(StatusEvent::Overall {
            completed,
            total,
            percent,
        })
    }

    fn on_finalize(&self, format: ArchiveFormat) -> CallbackFuture<'_> {
        self.send(StatusEvent::Finalize { format })
    }

    fn on_warning(&self, message: &str) -> CallbackFuture<'_> {
        self.send(StatusEvent::Warning {
            message: message.to_string(),
        })
    }
}
