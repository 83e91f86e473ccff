//! Property-based tests using proptest.
//!
//! These tests verify invariants of path validation and archive creation
//! using randomly generated inputs.

mod common;

use packsmith::{
    ArchiveEntry, ArchiveFormat, ArchivePath, ArchiveRequest, CompressionLevel, EntryStatus,
    NoProgress, StatusLog, create_archive,
};
use proptest::prelude::*;

/// Strategy for generating valid archive path strings.
///
/// - 1-4 path components separated by '/'
/// - Each component is 1-10 alphanumeric characters with optional underscores/dots/dashes
/// - Excludes "." and ".." segments
fn valid_path_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-zA-Z0-9][a-zA-Z0-9_.-]{0,9}", 1..4)
        .prop_map(|parts| parts.join("/"))
        .prop_filter("must not contain dot segments", |s| {
            !s.split('/').any(|seg| seg == "." || seg == "..")
        })
}

fn format_strategy() -> impl Strategy<Value = ArchiveFormat> {
    prop_oneof![
        Just(ArchiveFormat::Zip),
        Just(ArchiveFormat::Tar),
        Just(ArchiveFormat::TarGz),
    ]
}

proptest! {
    /// Valid paths should always parse successfully.
    #[test]
    fn valid_paths_parse_successfully(path in valid_path_strategy()) {
        let parsed = ArchivePath::new(&path);
        prop_assert!(parsed.is_ok(), "Valid path '{}' failed to parse: {:?}", path, parsed);
        let parsed = parsed.unwrap();
        prop_assert_eq!(parsed.as_str(), path.as_str());
    }

    /// Paths with NUL bytes should be rejected.
    #[test]
    fn nul_bytes_rejected(
        prefix in "[a-zA-Z0-9]{1,10}",
        suffix in "[a-zA-Z0-9]{1,10}"
    ) {
        let path = format!("{}\0{}", prefix, suffix);
        prop_assert!(ArchivePath::new(&path).is_err());
    }

    /// Absolute paths should be rejected.
    #[test]
    fn absolute_paths_rejected(path in "/[a-zA-Z0-9/]+") {
        prop_assert!(ArchivePath::new(&path).is_err());
    }

    /// Path traversal segments should be rejected.
    #[test]
    fn traversal_paths_rejected(
        prefix in "[a-zA-Z0-9]{1,5}",
        suffix in "[a-zA-Z0-9]{1,5}"
    ) {
        let path = format!("{}/../{}", prefix, suffix);
        prop_assert!(ArchivePath::new(&path).is_err());
    }

    /// Normalizing backslash-separated paths yields the slash form.
    #[test]
    fn normalize_converts_backslashes(parts in proptest::collection::vec("[a-zA-Z0-9]{1,8}", 1..5)) {
        let windows = parts.join("\\");
        let normalized = ArchivePath::normalize(&windows).unwrap();
        prop_assert_eq!(normalized.as_str(), parts.join("/"));
        prop_assert_eq!(normalized.depth(), parts.len() - 1);
    }

    /// Levels above 9 are rejected strictly and clamped leniently.
    #[test]
    fn compression_level_bounds(level in 0u32..1000) {
        let strict = CompressionLevel::new(level);
        prop_assert_eq!(strict.is_ok(), level <= 9);
        prop_assert_eq!(CompressionLevel::clamped(level).get(), level.min(9));
    }
}

mod archive_properties {
    use super::*;

    fn data_strategy(max_size: usize) -> impl Strategy<Value = Vec<u8>> {
        prop_oneof![
            proptest::collection::vec(any::<u8>(), 0..max_size),
            (any::<u8>(), 0..max_size).prop_map(|(b, n)| vec![b; n]),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Whatever goes in comes back out, in order, for every format.
        #[test]
        fn entries_round_trip_in_order(
            format in format_strategy(),
            level in 0u32..=9,
            files in proptest::collection::vec(data_strategy(2048), 1..6),
        ) {
            let mut request = ArchiveRequest::new(format, "prop").level(level).unwrap();
            for (i, data) in files.iter().enumerate() {
                let path = format!("dir{}/file{}.bin", i % 2, i);
                request.push(ArchiveEntry::from_bytes(&path, data.clone()).unwrap());
            }

            let mut log = StatusLog::new();
            let output = create_archive(&mut request, &mut log, None).unwrap();
            prop_assert_eq!(output.entries_written, files.len());

            let read = common::read_any(format, &output.bytes);
            prop_assert_eq!(read.len(), files.len());
            for (i, (name, data)) in read.iter().enumerate() {
                prop_assert_eq!(name, &format!("dir{}/file{}.bin", i % 2, i));
                prop_assert_eq!(data, &files[i]);
            }

            let percents = log.overall_percents();
            prop_assert!(percents.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(percents.last().copied(), Some(100));
            prop_assert!(request.entries().iter().all(|e| e.status() == EntryStatus::Completed));
        }

        /// Deterministic runs are byte-identical.
        #[test]
        fn deterministic_runs_identical(
            format in format_strategy(),
            data in data_strategy(4096),
        ) {
            let build = || {
                let mut request = ArchiveRequest::new(format, "det").deterministic(true);
                request.push(ArchiveEntry::from_bytes("data.bin", data.clone()).unwrap());
                create_archive(&mut request, &mut NoProgress, None).unwrap().bytes
            };
            prop_assert_eq!(build(), build());
        }
    }
}
