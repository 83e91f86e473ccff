//! Progress bar implementation for CLI operations.

use indicatif::{ProgressBar, ProgressStyle};
use packsmith::{ArchiveFormat, ArchivePath, EntryStatus, StatusReporter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const NAME_WIDTH: usize = 40;

/// Progress display for archive creation
pub struct CliProgress {
    bar: ProgressBar,
    interrupted: Arc<AtomicBool>,
    warnings: Vec<String>,
}

impl CliProgress {
    /// Creates a new progress display
    pub fn new(total_entries: u64, quiet: bool, interrupted: Arc<AtomicBool>) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total_entries);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            pb.set_style(style);
            pb
        };

        Self {
            bar,
            interrupted,
            warnings: Vec::new(),
        }
    }

    /// Warnings reported during the run
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Finishes the progress display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Leaves the bar visible with a failure message
    pub fn abandon(&self, msg: impl Into<String>) {
        self.bar.abandon_with_message(msg.into());
    }
}

fn shorten(name: &str) -> String {
    let count = name.chars().count();
    if count <= NAME_WIDTH {
        return name.to_string();
    }
    let tail: String = name.chars().skip(count - (NAME_WIDTH - 3)).collect();
    format!("...{}", tail)
}

impl StatusReporter for CliProgress {
    fn on_status(&mut self, _index: usize, path: &ArchivePath, status: EntryStatus, _progress: u8) {
        match status {
            EntryStatus::Processing => self.bar.set_message(shorten(path.as_str())),
            EntryStatus::Completed => self.bar.inc(1),
            EntryStatus::Error => self.bar.set_message(format!("failed: {}", shorten(path.as_str()))),
            EntryStatus::Pending => {}
        }
    }

    fn on_finalize(&mut self, format: ArchiveFormat) {
        self.bar.set_message(format!("writing {} container", format));
    }

    fn on_warning(&mut self, message: &str) {
        self.bar.suspend(|| eprintln!("Warning: {}", message));
        self.warnings.push(message.to_string());
    }

    fn should_cancel(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("a.txt"), "a.txt");
        let long = "ä".repeat(60);
        let short = shorten(&long);
        assert!(short.starts_with("..."));
        assert_eq!(short.chars().count(), NAME_WIDTH);
    }

    #[test]
    fn test_cancel_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let progress = CliProgress::new(1, true, Arc::clone(&flag));
        assert!(!progress.should_cancel());
        flag.store(true, Ordering::SeqCst);
        assert!(progress.should_cancel());
    }
}
