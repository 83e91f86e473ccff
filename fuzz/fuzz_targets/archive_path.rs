//! Fuzz target for ArchivePath::new and ArchivePath::normalize.
//!
//! Run with: cargo +nightly fuzz run archive_path
//!
//! Properties checked on every accepted path:
//! - No `.` or `..` segments
//! - Not absolute, no trailing slash, no empty segments
//! - No NUL bytes or backslashes after normalization

#![no_main]

use libfuzzer_sys::fuzz_target;
use packsmith::ArchivePath;

fn check(path: &ArchivePath) {
    let s = path.as_str();
    assert!(!s.is_empty());
    assert!(!s.starts_with('/'), "absolute path accepted: {:?}", s);
    assert!(!s.ends_with('/'), "trailing slash accepted: {:?}", s);
    assert!(!s.contains('\0'), "NUL byte accepted: {:?}", s);
    for segment in s.split('/') {
        assert!(
            !segment.is_empty() && segment != "." && segment != "..",
            "bad segment {:?} in {:?}",
            segment,
            s
        );
    }
    assert_eq!(path.depth(), s.matches('/').count());
}

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(path) = ArchivePath::new(input) {
            check(&path);
            assert_eq!(path.as_str(), input);
        }
        if let Ok(path) = ArchivePath::normalize(input) {
            check(&path);
            assert!(!path.as_str().contains('\\'));
        }
    }
});
