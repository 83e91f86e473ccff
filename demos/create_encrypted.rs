//! Create a password-protected ZIP archive.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example create_encrypted -- secret mypassword
//! ```
//!
//! Entries are encrypted with AES-256. Any unzip tool with WinZip AES
//! support (7-Zip, `unzip` builds with AES, macOS Archive Utility via
//! third-party tools) can open the result.

use packsmith::{ArchiveEntry, ArchiveFormat, ArchiveRequest, EncryptionEngine, Password};
use packsmith::{Result, StatusLog, create_archive};
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <name> <password>", args[0]);
        std::process::exit(1);
    }

    // The engine must be ready before an encrypted archive can be requested.
    let engine = EncryptionEngine::initialize()?;

    let mut request = ArchiveRequest::new(ArchiveFormat::Zip, args[1].as_str())
        .password(Password::new(args[2].as_str()));
    request.push(ArchiveEntry::from_bytes(
        "credentials.txt",
        "user: admin\ntoken: 0123456789abcdef\n",
    )?);
    request.push(ArchiveEntry::from_bytes("notes/plan.md", "# Plan\n\n- ship it\n")?);

    let mut log = StatusLog::new();
    let output = create_archive(&mut request, &mut log, Some(&engine))?;
    std::fs::write(&output.suggested_file_name, &output.bytes)?;

    println!(
        "Wrote {} ({} encrypted entries, {} bytes)",
        output.suggested_file_name,
        output.entries_written,
        output.len()
    );
    for warning in log.warnings() {
        println!("warning: {}", warning);
    }

    Ok(())
}
