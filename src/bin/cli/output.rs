//! Output formatting for CLI operations.

use packsmith::progress::{format_bytes_iec, format_duration};
use packsmith::{ArchiveEntry, ArchiveFormat, ArchiveOutput, EntryStatus, Error};
use serde_json::json;
use std::path::Path;
use std::time::Duration;

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a successfully written archive
    fn format_created(
        &self,
        output: &ArchiveOutput,
        path: &Path,
        elapsed: Duration,
        warnings: &[String],
    ) -> String;

    /// Formats a failed run together with the per-entry states it left behind
    fn format_failure(&self, error: &Error, entries: &[ArchiveEntry]) -> String;

    /// Formats the list of supported formats
    fn format_formats(&self) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_created(
        &self,
        output: &ArchiveOutput,
        path: &Path,
        elapsed: Duration,
        _warnings: &[String],
    ) -> String {
        format!(
            "Created {} ({} files, {} -> {}, {:.1}%) in {}",
            path.display(),
            output.entries_written,
            format_bytes_iec(output.input_bytes),
            format_bytes_iec(output.len() as u64),
            output.ratio() * 100.0,
            format_duration(elapsed)
        )
    }

    fn format_failure(&self, error: &Error, entries: &[ArchiveEntry]) -> String {
        let mut out = format!("Error: {}\n", error);
        let failed: Vec<_> = entries
            .iter()
            .filter(|e| e.status() == EntryStatus::Error)
            .collect();
        for entry in &failed {
            out.push_str(&format!("  failed: {}\n", entry.path()));
        }
        let done = entries
            .iter()
            .filter(|e| e.status() == EntryStatus::Completed)
            .count();
        out.push_str(&format!(
            "{} of {} files were processed before stopping",
            done,
            entries.len()
        ));
        out
    }

    fn format_formats(&self) -> String {
        let mut out = format!(
            "{:<8} {:<10} {:<11} {:<10} {}\n",
            "Format", "Extension", "Compression", "Password", "MIME type"
        );
        out.push_str(&"-".repeat(60));
        for format in ArchiveFormat::ALL {
            let caps = format.capabilities();
            let yes_no = |b: bool| if b { "yes" } else { "no" };
            out.push_str(&format!(
                "\n{:<8} {:<10} {:<11} {:<10} {}",
                format.name(),
                format.extension(),
                yes_no(caps.compression),
                yes_no(caps.encryption),
                format.mime_type()
            ));
        }
        out
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_created(
        &self,
        output: &ArchiveOutput,
        path: &Path,
        elapsed: Duration,
        warnings: &[String],
    ) -> String {
        let obj = json!({
            "success": true,
            "path": path.display().to_string(),
            "file_name": output.suggested_file_name,
            "format": output.format.name(),
            "mime_type": output.mime_type(),
            "entries_written": output.entries_written,
            "input_bytes": output.input_bytes,
            "output_bytes": output.len(),
            "ratio": output.ratio(),
            "elapsed_ms": elapsed.as_millis() as u64,
            "warnings": warnings,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_failure(&self, error: &Error, entries: &[ArchiveEntry]) -> String {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "path": e.path().as_str(),
                    "status": e.status().as_str(),
                    "progress": e.progress(),
                })
            })
            .collect();
        let obj = json!({
            "success": false,
            "code": error.code().as_str(),
            "error": error.to_string(),
            "entries": items,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_formats(&self) -> String {
        let items: Vec<_> = ArchiveFormat::ALL
            .iter()
            .map(|f| {
                let caps = f.capabilities();
                json!({
                    "name": f.name(),
                    "extension": f.extension(),
                    "mime_type": f.mime_type(),
                    "compression": caps.compression,
                    "encryption": caps.encryption,
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Creates a formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_formats_lists_all() {
        let text = HumanFormatter.format_formats();
        assert!(text.contains("zip"));
        assert!(text.contains("tar.gz"));
        assert!(text.contains("application/gzip"));
    }

    #[test]
    fn test_json_failure_carries_code() {
        let entries = vec![ArchiveEntry::from_bytes("a.txt", b"a".to_vec()).unwrap()];
        let text = JsonFormatter.format_failure(&Error::Cancelled, &entries);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["code"], Error::Cancelled.code().as_str());
        assert_eq!(value["entries"][0]["status"], "pending");
    }
}
