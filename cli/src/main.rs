//! Mirror - command-line interface for the verified-copy engine.
//!
//! Provides three verbs over the engine's entry points (single file,
//! directory contents, whole directory), console rendering of progress and
//! status events, and JSON configuration defaults.

mod config;

use clap::{Args, Parser, Subcommand};
use config::CliConfig;
use engine::{
    copy_directory, copy_directory_contents, copy_with_verification, fs_ops, CancelToken,
    CopyObserver, CopyOptions, EngineError, FileRole, HashAlgorithm,
};
use std::cell::Cell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Mirror - integrity-verified file copying
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(version = "0.1.0")]
#[command(about = "Copy files and directories with hash verification")]
struct Cli {
    /// Configuration file providing flag defaults
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy a single file with hash verification
    CopyFile(TransferArgs),
    /// Copy the files contained in a directory (the root itself is not recreated)
    CopyDirContent(TransferArgs),
    /// Copy an entire directory, including the root folder
    CopyDir(TransferArgs),
}

#[derive(Args, Debug)]
struct TransferArgs {
    /// Source path
    #[arg(long, value_name = "PATH")]
    src: PathBuf,

    /// Destination path
    #[arg(long, value_name = "PATH")]
    dst: PathBuf,

    /// Overwrite the destination if it exists
    #[arg(long)]
    overwrite: bool,

    /// Show copy and hash progress
    #[arg(long)]
    progress: bool,

    /// Delete the source once the copy has verified
    #[arg(long)]
    delete_source_if_verified: bool,

    /// Hash algorithm: md5, sha1, sha256, sha384, or sha512
    #[arg(long, value_name = "ALGORITHM")]
    hash: Option<String>,
}

/// Console implementation of CopyObserver.
///
/// Percent events render as in-place `\r` lines, throttled to avoid
/// flooding the terminal; status lines always print.
struct ConsoleProgress {
    last_update: Cell<Instant>,
    progress_line_open: Cell<bool>,
}

impl ConsoleProgress {
    fn new() -> Self {
        ConsoleProgress {
            last_update: Cell::new(Instant::now()),
            progress_line_open: Cell::new(false),
        }
    }

    /// Throttle percent updates to at most one per 100ms; 100% always renders.
    fn should_render(&self, percent: f64) -> bool {
        if percent >= 100.0 {
            return true;
        }
        if self.last_update.get().elapsed().as_millis() < 100 {
            return false;
        }
        self.last_update.set(Instant::now());
        true
    }
}

impl CopyObserver for ConsoleProgress {
    fn on_copy_progress(&self, percent: f64) {
        if !self.should_render(percent) {
            return;
        }
        print!("\rCopy progress: {:6.2}%   ", percent);
        let _ = std::io::stdout().flush();
        self.progress_line_open.set(true);
    }

    fn on_hash_progress(&self, role: FileRole, percent: f64) {
        if !self.should_render(percent) {
            return;
        }
        print!("\rHashing ({}): {:6.2}%   ", role, percent);
        let _ = std::io::stdout().flush();
        self.progress_line_open.set(true);
    }

    fn on_status(&self, message: &str) {
        if self.progress_line_open.replace(false) {
            println!();
        }
        println!("{}", message);
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_idx])
}

fn print_dir_banner(title: &str, src: &Path, dst: &Path) -> Result<(), String> {
    if !src.is_dir() {
        return Err(format!("Source directory does not exist: {}", src.display()));
    }
    let files = fs_ops::collect_files(src).map_err(|e| e.to_string())?;
    let total: u64 = files
        .iter()
        .filter_map(|f| fs::metadata(f).ok())
        .map(|m| m.len())
        .sum();

    println!("{}", title);
    println!("From:  {}", src.display());
    println!("To:    {}", dst.display());
    println!("Files: {}", files.len());
    println!("Total Size: {}", format_bytes(total));
    println!();
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match run_cli(&cli) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Main CLI logic - separated for testability.
///
/// Returns `Ok(true)` when the transfer verified, `Ok(false)` on a
/// checksum mismatch, and `Err` on argument, configuration, or I/O faults.
fn run_cli(cli: &Cli) -> Result<bool, String> {
    let config = CliConfig::load_or_create(cli.config.as_deref())
        .map_err(|e| format!("Failed to load configuration: {}", e))?;

    let args = match &cli.command {
        Command::CopyFile(a) | Command::CopyDirContent(a) | Command::CopyDir(a) => a,
    };

    let algorithm_name = args.hash.as_deref().unwrap_or(&config.hash_algorithm);
    let algorithm: HashAlgorithm = algorithm_name
        .parse()
        .map_err(|e: EngineError| e.to_string())?;

    let options = CopyOptions::default()
        .with_overwrite(args.overwrite || config.overwrite)
        .with_hash_algorithm(algorithm)
        .with_enable_progress(args.progress || config.enable_progress)
        .with_delete_source_if_verified(
            args.delete_source_if_verified || config.delete_source_if_verified,
        );

    let cancel = CancelToken::new();
    let observer = ConsoleProgress::new();

    match &cli.command {
        Command::CopyFile(a) => {
            let size = fs::metadata(&a.src)
                .map(|m| m.len())
                .map_err(|_| format!("Source file does not exist: {}", a.src.display()))?;

            println!("Copying File:");
            println!("From: {}", a.src.display());
            println!("To:   {}", a.dst.display());
            println!("Size: {}", format_bytes(size));
            println!();

            copy_with_verification(&a.src, &a.dst, &options, &cancel, Some(&observer))
                .map_err(|e| e.to_string())
        }
        Command::CopyDirContent(a) => {
            print_dir_banner("Copying Directory Content:", &a.src, &a.dst)?;
            run_directory_op(copy_directory_contents(
                &a.src,
                &a.dst,
                &options,
                &cancel,
                Some(&observer),
            ))
        }
        Command::CopyDir(a) => {
            let new_root = a
                .src
                .file_name()
                .map(|name| a.dst.join(name))
                .unwrap_or_else(|| a.dst.clone());
            print_dir_banner("Copying Directory:", &a.src, &new_root)?;
            run_directory_op(copy_directory(
                &a.src,
                &a.dst,
                &options,
                &cancel,
                Some(&observer),
            ))
        }
    }
}

/// Map a directory-operation result onto the CLI's tri-state outcome:
/// a verification failure is a reportable mismatch, not a fault.
fn run_directory_op(result: Result<(), EngineError>) -> Result<bool, String> {
    match result {
        Ok(()) => Ok(true),
        Err(EngineError::VerificationFailed {
            source_path,
            destination_path,
        }) => {
            eprintln!(
                "Checksum mismatch: {} -> {}",
                source_path.display(),
                destination_path.display()
            );
            Ok(false)
        }
        Err(e) => Err(e.to_string()),
    }
}
