//! Status reporting, failure and cancellation tests.
//!
//! These tests drive whole runs through `create_archive` and check the
//! events a reporter sees, the state left on each entry, and the error
//! returned when a run stops early.

mod common;

use common::FailingSource;
use packsmith::{
    ArchiveEntry, ArchiveFormat, ArchivePath, AtomicProgress, EntryStatus, Error, ErrorCode,
    StatusEvent, StatusLog, StatusReporter, create_archive, status_fn,
};
use std::sync::Arc;

const THREE: &[(&str, &[u8])] = &[("a.txt", b"a"), ("b.txt", b"bb"), ("c.txt", b"ccc")];

// =============================================================================
// Event stream
// =============================================================================

#[test]
fn test_event_sequence_for_successful_run() {
    let mut request = common::request(ArchiveFormat::Tar, "events", THREE);
    let mut log = StatusLog::new();
    create_archive(&mut request, &mut log, None).unwrap();

    let events = log.events();
    assert_eq!(events.first(), Some(&StatusEvent::Start { total: 3 }));
    assert_eq!(
        events.last(),
        Some(&StatusEvent::Finalize {
            format: ArchiveFormat::Tar
        })
    );

    for index in 0..3 {
        assert_eq!(
            log.statuses_for(index),
            [EntryStatus::Processing, EntryStatus::Completed]
        );
    }
    assert!(log.warnings().is_empty());
    assert!(log.finalized());
}

#[test]
fn test_entries_are_processed_strictly_in_order() {
    let mut request = common::request(ArchiveFormat::Zip, "order", THREE);
    let mut log = StatusLog::new();
    create_archive(&mut request, &mut log, None).unwrap();

    let sequence: Vec<(usize, EntryStatus)> = log
        .events()
        .iter()
        .filter_map(|e| match e {
            StatusEvent::Status { index, status, .. } => Some((*index, *status)),
            _ => None,
        })
        .collect();
    assert_eq!(
        sequence,
        [
            (0, EntryStatus::Processing),
            (0, EntryStatus::Completed),
            (1, EntryStatus::Processing),
            (1, EntryStatus::Completed),
            (2, EntryStatus::Processing),
            (2, EntryStatus::Completed),
        ]
    );
}

#[test]
fn test_status_events_carry_paths_and_binary_progress() {
    let mut request = common::request(ArchiveFormat::TarGz, "paths", THREE);
    let mut log = StatusLog::new();
    create_archive(&mut request, &mut log, None).unwrap();

    for event in log.events() {
        if let StatusEvent::Status {
            index,
            path,
            status,
            progress,
        } = event
        {
            assert_eq!(path.as_str(), THREE[*index].0);
            match status {
                EntryStatus::Processing => assert_eq!(*progress, 0),
                EntryStatus::Completed => assert_eq!(*progress, 100),
                other => panic!("unexpected status {other}"),
            }
        }
    }
}

#[test]
fn test_overall_progress_is_monotonic_and_reaches_100() {
    let mut request = common::request(ArchiveFormat::Zip, "overall", THREE);
    let mut log = StatusLog::new();
    create_archive(&mut request, &mut log, None).unwrap();

    let percents = log.overall_percents();
    assert!(percents.windows(2).all(|w| w[0] <= w[1]), "{percents:?}");
    assert_eq!(percents.last(), Some(&100));
    assert!(percents.contains(&33));
    assert!(percents.contains(&66));
}

#[test]
fn test_closure_reporter() {
    let mut seen = Vec::new();
    let mut request = common::request(ArchiveFormat::Tar, "closure", THREE);
    {
        let mut reporter = status_fn(|index, status, progress| seen.push((index, status, progress)));
        create_archive(&mut request, &mut reporter, None).unwrap();
    }
    assert_eq!(seen.len(), 6);
    assert_eq!(seen[5], (2, EntryStatus::Completed, 100));
}

#[test]
fn test_atomic_progress_tracks_run() {
    let progress = AtomicProgress::shared();
    let mut reporter = Arc::clone(&progress);
    let mut request = common::request(ArchiveFormat::Zip, "atomic", THREE);
    create_archive(&mut request, &mut reporter, None).unwrap();

    assert_eq!(progress.total(), 3);
    assert_eq!(progress.completed(), 3);
    assert_eq!(progress.percent(), 100);
    assert!(!progress.is_cancelled());
}

// =============================================================================
// Preconditions
// =============================================================================

#[test]
fn test_empty_request_is_rejected_without_events() {
    for format in ArchiveFormat::ALL {
        let mut request = common::request(format, "empty", &[]);
        let mut log = StatusLog::new();
        let err = create_archive(&mut request, &mut log, None).unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert!(log.events().is_empty());
    }
}

// =============================================================================
// Failure
// =============================================================================

fn request_with_failure_at(format: ArchiveFormat, failing: usize) -> packsmith::ArchiveRequest {
    let mut request = packsmith::ArchiveRequest::new(format, "broken");
    for (i, (path, data)) in THREE.iter().enumerate() {
        let entry = if i == failing {
            ArchiveEntry::new(
                ArchivePath::new(path).unwrap(),
                FailingSource {
                    message: "permission denied",
                },
            )
        } else {
            ArchiveEntry::from_bytes(path, data.to_vec()).unwrap()
        };
        request.push(entry);
    }
    request
}

#[test]
fn test_read_failure_aborts_run() {
    for format in ArchiveFormat::ALL {
        let mut request = request_with_failure_at(format, 1);
        let mut log = StatusLog::new();
        let err = create_archive(&mut request, &mut log, None).unwrap_err();

        match &err {
            Error::ProcessingFailed {
                entry_index,
                path,
                message,
            } => {
                assert_eq!(*entry_index, Some(1));
                assert_eq!(path.as_deref(), Some("b.txt"));
                assert!(message.contains("permission denied"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.code(), ErrorCode::ProcessingFailed);

        let statuses: Vec<EntryStatus> = request.entries().iter().map(|e| e.status()).collect();
        assert_eq!(
            statuses,
            [
                EntryStatus::Completed,
                EntryStatus::Error,
                EntryStatus::Pending
            ]
        );
        assert_eq!(log.statuses_for(1), [EntryStatus::Processing, EntryStatus::Error]);
        assert!(log.statuses_for(2).is_empty());
        assert!(!log.finalized());
    }
}

#[test]
fn test_retry_after_failure_resets_entries() {
    let mut request = request_with_failure_at(ArchiveFormat::Tar, 0);
    assert!(create_archive(&mut request, &mut StatusLog::new(), None).is_err());
    assert_eq!(request.entries()[0].status(), EntryStatus::Error);

    let fixed = ArchiveEntry::from_bytes("a.txt", b"fixed".to_vec()).unwrap();
    request.entries_mut()[0] = fixed;

    let mut log = StatusLog::new();
    let output = create_archive(&mut request, &mut log, None).unwrap();
    assert_eq!(output.entries_written, 3);
    assert_eq!(common::read_tar(&output.bytes)[0].1, b"fixed");
    assert!(
        request
            .entries()
            .iter()
            .all(|e| e.status() == EntryStatus::Completed)
    );
}

#[test]
fn test_second_run_starts_from_pending() {
    let mut request = common::request(ArchiveFormat::Zip, "twice", THREE);
    create_archive(&mut request, &mut StatusLog::new(), None).unwrap();

    let mut log = StatusLog::new();
    create_archive(&mut request, &mut log, None).unwrap();
    assert_eq!(
        log.statuses_for(0),
        [EntryStatus::Processing, EntryStatus::Completed]
    );
    assert_eq!(log.overall_percents().first(), Some(&0));
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_cancel_between_entries() {
    let mut request = common::request(ArchiveFormat::Zip, "cancel", THREE);
    let mut log = StatusLog::new().cancel_before(2);
    let err = create_archive(&mut request, &mut log, None).unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert_eq!(err.code(), ErrorCode::Cancelled);
    let statuses: Vec<EntryStatus> = request.entries().iter().map(|e| e.status()).collect();
    assert_eq!(
        statuses,
        [
            EntryStatus::Completed,
            EntryStatus::Completed,
            EntryStatus::Pending
        ]
    );
    assert!(!log.finalized());
}

#[test]
fn test_cancel_before_first_entry() {
    struct CancelNow;
    impl StatusReporter for CancelNow {
        fn should_cancel(&self) -> bool {
            true
        }
    }

    let mut request = common::request(ArchiveFormat::TarGz, "cancel", THREE);
    let err = create_archive(&mut request, &mut CancelNow, None).unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(
        request
            .entries()
            .iter()
            .all(|e| e.status() == EntryStatus::Pending)
    );
}

#[test]
fn test_atomic_cancel_flag() {
    let progress = AtomicProgress::shared();
    progress.cancel();
    let mut reporter = Arc::clone(&progress);
    let mut request = common::request(ArchiveFormat::Tar, "cancel", THREE);
    let err = create_archive(&mut request, &mut reporter, None).unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}
