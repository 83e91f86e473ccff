//! Create a ZIP, TAR or TAR.GZ archive from files.
//!
//! This example demonstrates basic archive creation:
//! - Adding files from disk and data from memory
//! - Choosing the format and compression level
//! - Saving the result under its suggested file name
//!
//! # Usage
//!
//! ```bash
//! cargo run --example create_archive -- tar.gz backup file1.txt file2.txt
//! ```

use packsmith::progress::format_bytes_iec;
use packsmith::{ArchiveEntry, ArchiveFormat, ArchivePath, ArchiveRequest, FileSource};
use packsmith::{NoProgress, Result, create_archive};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <zip|tar|tar.gz> <name> [file1] [file2...]", args[0]);
        eprintln!();
        eprintln!("Creates an archive from the specified files.");
        eprintln!("If no files are specified, creates a demo archive with sample data.");
        std::process::exit(1);
    }

    let format: ArchiveFormat = args[1].parse()?;
    let mut request = ArchiveRequest::new(format, args[2].as_str())
        .level(9)?
        .deterministic(true);

    println!("Creating {} archive: {}", format, request.suggested_file_name());

    if args.len() == 3 {
        println!("No input files specified, adding demo content...");
        request.push(ArchiveEntry::from_bytes("hello.txt", "Hello, World!\n")?);
        request.push(ArchiveEntry::from_bytes(
            "data/numbers.txt",
            (1..=100).map(|i| format!("{}\n", i)).collect::<String>(),
        )?);
    } else {
        for file in &args[3..] {
            let path = Path::new(file);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.clone());
            request.push(ArchiveEntry::new(
                ArchivePath::normalize(&name)?,
                FileSource::new(path),
            ));
            println!("  + {}", name);
        }
    }

    let output = create_archive(&mut request, &mut NoProgress, None)?;
    std::fs::write(&output.suggested_file_name, &output.bytes)?;

    println!();
    println!("Entries:     {}", output.entries_written);
    println!("Input size:  {}", format_bytes_iec(output.input_bytes));
    println!("Output size: {}", format_bytes_iec(output.len() as u64));
    println!("Ratio:       {:.1}%", output.ratio() * 100.0);
    println!("Written to:  {}", output.suggested_file_name);

    Ok(())
}
