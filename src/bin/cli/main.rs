//! CLI tool for packsmith archive creation.

mod commands;
mod exit_codes;
mod file_selector;
mod output;
mod password;
mod progress;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use packsmith::ArchiveFormat;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use exit_codes::ExitCode;

/// Build ZIP, TAR and TAR.GZ archives
#[derive(Parser)]
#[command(name = "packsmith")]
#[command(author, version, about = "Build ZIP, TAR and TAR.GZ archives", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long = "format-output", value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Log every step to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an archive (alias: a)
    #[command(alias = "a")]
    Create {
        /// Base name of the archive, without extension
        output_name: String,

        /// Files and directories to add
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Container format: zip, tar or tar.gz
        #[arg(short = 't', long, default_value = "zip", env = "PACKSMITH_FORMAT", value_parser = parse_format)]
        format: ArchiveFormat,

        /// Compression level (0-9)
        #[arg(short = 'l', long, default_value = "6", env = "PACKSMITH_LEVEL")]
        level: u32,

        /// Encrypt a ZIP archive with this password
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Prompt for the password instead of passing it on the command line
        #[arg(long, conflicts_with = "password")]
        prompt_password: bool,

        /// Directory the archive is written to
        #[arg(short = 'o', long, default_value = ".")]
        output_dir: PathBuf,

        /// Only add files matching these patterns
        #[arg(short = 'i', long)]
        include: Vec<String>,

        /// Skip files matching these patterns
        #[arg(short = 'x', long)]
        exclude: Vec<String>,

        /// Write fixed timestamps so equal input gives equal bytes
        #[arg(long)]
        deterministic: bool,

        /// Overwrite an existing archive
        #[arg(long)]
        force: bool,
    },

    /// List supported formats and their options
    Formats,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn parse_format(s: &str) -> Result<ArchiveFormat, String> {
    s.parse().map_err(|e: packsmith::Error| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        if let Err(e) = simple_logger::SimpleLogger::new()
            .with_level(log::LevelFilter::Debug)
            .init()
        {
            eprintln!("Warning: could not install logger: {}", e);
        }
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(exit_codes::USER_INTERRUPT);
        }
        eprintln!("\nInterrupted, stopping after the current file (press again to abort)");
    })
    .ok();

    let exit_code = match cli.command {
        Commands::Create {
            output_name,
            files,
            format,
            level,
            password,
            prompt_password,
            output_dir,
            include,
            exclude,
            deterministic,
            force,
        } => commands::create(commands::CreateConfig {
            output_name: &output_name,
            files: &files,
            format,
            level,
            password,
            prompt_password,
            output_dir: &output_dir,
            include: &include,
            exclude: &exclude,
            deterministic,
            force,
            output: cli.output,
            quiet: cli.quiet,
            interrupted,
        }),

        Commands::Formats => commands::formats(cli.output),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
