//! Watch per-entry status while an archive is built.
//!
//! Shows three ways to observe a run:
//! - A custom `StatusReporter`
//! - A closure via `status_fn`
//! - `AtomicProgress` shared with another thread, which can also cancel
//!
//! # Usage
//!
//! ```bash
//! cargo run --example progress_callback
//! ```

use packsmith::{
    ArchiveEntry, ArchiveFormat, ArchivePath, ArchiveRequest, AtomicProgress, EntryStatus,
    Error, Result, StatusReporter, create_archive, status_fn,
};
use std::sync::Arc;

struct Printer;

impl StatusReporter for Printer {
    fn on_start(&mut self, total_entries: usize) {
        println!("starting: {} entries", total_entries);
    }

    fn on_status(&mut self, index: usize, path: &ArchivePath, status: EntryStatus, progress: u8) {
        println!("  [{}] {:<24} {:<10} {:>3}%", index, path, status, progress);
    }

    fn on_overall(&mut self, completed: usize, total: usize, percent: u8) {
        println!("  overall {}/{} ({}%)", completed, total, percent);
    }

    fn on_finalize(&mut self, format: ArchiveFormat) {
        println!("writing {} container", format);
    }
}

fn sample_request(format: ArchiveFormat) -> Result<ArchiveRequest> {
    let mut request = ArchiveRequest::new(format, "progress-demo");
    for i in 0..5 {
        let body = format!("file number {}\n", i).repeat(1000);
        request.push(ArchiveEntry::from_bytes(&format!("files/{}.txt", i), body)?);
    }
    Ok(request)
}

fn main() -> Result<()> {
    println!("== custom reporter ==");
    let mut request = sample_request(ArchiveFormat::TarGz)?;
    let output = create_archive(&mut request, &mut Printer, None)?;
    println!("done: {} bytes\n", output.len());

    println!("== closure ==");
    let mut request = sample_request(ArchiveFormat::Zip)?;
    let mut reporter = status_fn(|index, status, progress| {
        if status.is_terminal() {
            println!("  entry {} -> {} ({}%)", index, status, progress);
        }
    });
    create_archive(&mut request, &mut reporter, None)?;
    println!();

    println!("== atomic progress with cancellation ==");
    let progress = AtomicProgress::shared();
    progress.cancel();
    let mut reporter = Arc::clone(&progress);
    let mut request = sample_request(ArchiveFormat::Tar)?;
    match create_archive(&mut request, &mut reporter, None) {
        Err(Error::Cancelled) => println!("cancelled as requested"),
        Err(e) => return Err(e),
        Ok(_) => println!("finished before cancellation was seen"),
    }
    for entry in request.entries() {
        println!("  {:<16} {}", entry.path(), entry.status());
    }

    Ok(())
}
