//! Command implementations for the CLI.

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::file_selector::FileSelector;
use crate::output::create_formatter;
use crate::password::get_or_prompt_password;
use crate::progress::CliProgress;
use packsmith::{
    ArchiveEntry, ArchiveFormat, ArchivePath, ArchiveRequest, EncryptionEngine, FileSource,
    create_archive,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Instant;
use walkdir::WalkDir;

/// Configuration for the create command
pub struct CreateConfig<'a> {
    pub output_name: &'a str,
    pub files: &'a [PathBuf],
    pub format: ArchiveFormat,
    pub level: u32,
    pub password: Option<String>,
    pub prompt_password: bool,
    pub output_dir: &'a Path,
    pub include: &'a [String],
    pub exclude: &'a [String],
    pub deterministic: bool,
    pub force: bool,
    pub output: OutputFormat,
    pub quiet: bool,
    pub interrupted: Arc<AtomicBool>,
}

/// Walks the inputs and returns `(disk path, archive path)` pairs in the
/// order they will be written.
///
/// A directory argument keeps its own name as the top-level folder.
fn collect_files(inputs: &[PathBuf], selector: &FileSelector) -> Vec<(PathBuf, ArchivePath)> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let root = input
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            for entry in WalkDir::new(input).follow_links(false).sort_by_file_name() {
                let entry = match entry {
                    Ok(e) => e,
                    Err(e) => {
                        eprintln!("Warning: {}", e);
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }

                let rel = entry
                    .path()
                    .strip_prefix(input)
                    .unwrap_or(entry.path())
                    .to_string_lossy()
                    .to_string();
                let name = if root.is_empty() {
                    rel
                } else {
                    format!("{}/{}", root, rel)
                };

                push_file(&mut files, selector, entry.path(), &name);
            }
        } else if input.is_file() {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            push_file(&mut files, selector, input, &name);
        } else {
            eprintln!("Warning: {} does not exist", input.display());
        }
    }

    files
}

fn push_file(
    files: &mut Vec<(PathBuf, ArchivePath)>,
    selector: &FileSelector,
    disk: &Path,
    name: &str,
) {
    match ArchivePath::normalize(name) {
        Ok(path) if selector.matches(path.as_str()) => files.push((disk.to_path_buf(), path)),
        Ok(_) => log::debug!("skipping {}", name),
        Err(e) => eprintln!("Warning: skipping {}: {}", name, e),
    }
}

/// Create an archive
pub fn create(config: CreateConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.output);
    let started = Instant::now();

    let selector = match FileSelector::new(config.include, config.exclude) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::BadArgs;
        }
    };

    let files = collect_files(config.files, &selector);
    if files.is_empty() {
        eprintln!("Error: No files to add to archive");
        return ExitCode::BadArgs;
    }

    let mut request = match ArchiveRequest::new(config.format, config.output_name)
        .level(config.level)
    {
        Ok(r) => r.deterministic(config.deterministic),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::BadArgs;
        }
    };
    for (disk, path) in files {
        request.push(ArchiveEntry::new(path, FileSource::new(disk)));
    }

    let password = get_or_prompt_password(config.password, config.prompt_password);
    if config.prompt_password && password.is_none() {
        return ExitCode::BadArgs;
    }

    let engine = match &password {
        Some(_) if config.format.capabilities().encryption => match EncryptionEngine::initialize() {
            Ok(engine) => Some(engine),
            Err(e) => {
                eprintln!("Error: {}", e);
                return error_to_exit_code(&e);
            }
        },
        _ => None,
    };
    if let Some(p) = password {
        request = request.password(p);
    }

    let target = config.output_dir.join(request.suggested_file_name());
    if target.exists() && !config.force {
        eprintln!(
            "Error: {} already exists (use --force to overwrite)",
            target.display()
        );
        return ExitCode::BadArgs;
    }

    let mut progress = CliProgress::new(
        request.entries().len() as u64,
        config.quiet,
        config.interrupted,
    );

    let output = match create_archive(&mut request, &mut progress, engine.as_ref()) {
        Ok(output) => {
            progress.finish();
            output
        }
        Err(e) => {
            progress.abandon("failed");
            eprintln!("{}", formatter.format_failure(&e, request.entries()));
            return error_to_exit_code(&e);
        }
    };

    let written = std::fs::create_dir_all(config.output_dir)
        .and_then(|()| std::fs::write(&target, &output.bytes));
    if let Err(e) = written {
        eprintln!("Error writing {}: {}", target.display(), e);
        return ExitCode::IoError;
    }

    if !config.quiet || config.output == OutputFormat::Json {
        println!(
            "{}",
            formatter.format_created(&output, &target, started.elapsed(), progress.warnings())
        );
    }

    if progress.warnings().is_empty() {
        ExitCode::Success
    } else {
        ExitCode::Warning
    }
}

/// List supported formats
pub fn formats(output: OutputFormat) -> ExitCode {
    println!("{}", create_formatter(output).format_formats());
    ExitCode::Success
}
