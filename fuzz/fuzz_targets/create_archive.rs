//! Fuzz target for create_archive with arbitrary entry layouts.
//!
//! The input is split into entries; the first byte picks the format and
//! level. Every successful run must read back to the same entries.
//!
//! Run with: cargo +nightly fuzz run create_archive

#![no_main]

use libfuzzer_sys::fuzz_target;
use packsmith::{ArchiveEntry, ArchiveFormat, ArchiveRequest, NoProgress, create_archive};
use std::io::{Cursor, Read};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let format = ArchiveFormat::ALL[selector as usize % 3];
    let level = u32::from(selector / 3) % 10;

    let mut request = ArchiveRequest::new(format, "fuzz").level_clamped(level);
    let chunks: Vec<&[u8]> = rest.split(|&b| b == 0xFF).take(16).collect();
    for (i, chunk) in chunks.iter().enumerate() {
        let Ok(entry) = ArchiveEntry::from_bytes(&format!("f/{}.bin", i), chunk.to_vec()) else {
            return;
        };
        request.push(entry);
    }

    let Ok(output) = create_archive(&mut request, &mut NoProgress, None) else {
        return;
    };
    assert_eq!(output.entries_written, chunks.len());

    let tar_bytes = match format {
        ArchiveFormat::Zip => {
            let mut archive = zip::ZipArchive::new(Cursor::new(&output.bytes)).unwrap();
            assert_eq!(archive.len(), chunks.len());
            for (i, chunk) in chunks.iter().enumerate() {
                let mut content = Vec::new();
                archive.by_index(i).unwrap().read_to_end(&mut content).unwrap();
                assert_eq!(&content, chunk);
            }
            return;
        }
        ArchiveFormat::Tar => output.bytes,
        ArchiveFormat::TarGz => {
            let mut out = Vec::new();
            flate2::read::GzDecoder::new(output.bytes.as_slice())
                .read_to_end(&mut out)
                .unwrap();
            out
        }
    };

    let mut archive = tar::Archive::new(Cursor::new(tar_bytes));
    let mut count = 0;
    for (entry, chunk) in archive.entries().unwrap().zip(&chunks) {
        let mut content = Vec::new();
        entry.unwrap().read_to_end(&mut content).unwrap();
        assert_eq!(&content, chunk);
        count += 1;
    }
    assert_eq!(count, chunks.len());
});
