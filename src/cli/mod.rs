//! The amkscan Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::cli::args::{Command, ScanArgs};
use crate::cli::output::CheckStatus;
use crate::tokens::{scan_tokens, two_pass};
use crate::{err_msg, ScanError, ScanResult, Scanner};

pub mod args;
pub mod output;

/// File extensions `check` picks up when given a directory.
const MML_EXTENSIONS: &[&str] = &["txt", "mml"];

/// The main entry point for the CLI.
pub fn run() {
    let args = ScanArgs::parse();
    init_tracing(args.verbose);

    // Dispatch to the appropriate subcommand handler.
    let result = match args.command {
        Command::Tokens {
            file,
            defines,
            json,
        } => handle_tokens(&file, &defines, json).map(|_| true),
        Command::Check { path, defines } => handle_check(&path, &defines),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            output::report_error(e);
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Reads `path` and builds a scanner with the command-line macros predefined.
fn load_scanner(path: &Path, defines: &[(String, String)]) -> ScanResult<Scanner> {
    let text = fs::read_to_string(path)
        .map_err(|e| err_msg!(Io, "cannot read {}", path.display()).with_cause(e))?;
    let mut scanner = Scanner::new(&text);
    for (key, value) in defines {
        scanner.define(key, value);
    }
    Ok(scanner)
}

/// Handles the `tokens` subcommand.
fn handle_tokens(path: &Path, defines: &[(String, String)], json: bool) -> ScanResult<()> {
    let mut scanner = load_scanner(path, defines)?;
    let name = path.display().to_string();
    let tokens = scan_tokens(&mut scanner).map_err(|e| e.with_source_name(&name))?;
    if json {
        output::print_tokens_json(&tokens)
    } else {
        output::print_tokens(&tokens)
    }
}

/// Handles the `check` subcommand. Returns `Ok(false)` if any file failed.
fn handle_check(path: &Path, defines: &[(String, String)]) -> ScanResult<bool> {
    let files = collect_sources(path)?;
    if files.is_empty() {
        return Err(err_msg!(Io, "no MML files found under {}", path.display()));
    }

    let mut all_ok = true;
    for file in &files {
        let outcome = load_scanner(file, defines).and_then(|mut scanner| two_pass(&mut scanner));
        match outcome {
            Ok(replay) if replay.is_identical() => {
                output::print_check(file, CheckStatus::Ok(&replay))?;
            }
            Ok(replay) => {
                all_ok = false;
                output::print_check(file, CheckStatus::Diverged(&replay))?;
            }
            Err(err) => {
                all_ok = false;
                let err = err.with_source_name(&file.display().to_string());
                output::print_check(file, CheckStatus::Failed(&err))?;
                output::report_error(err);
            }
        }
    }
    Ok(all_ok)
}

/// A single file as given, or every MML file below a directory in sorted order.
fn collect_sources(path: &Path) -> ScanResult<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            err_msg!(Io, "cannot walk {}", path.display()).with_cause(e)
        })?;
        if entry.file_type().is_file() && is_mml_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_mml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MML_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_mml_extensions() {
        assert!(is_mml_file(Path::new("songs/castle.txt")));
        assert!(is_mml_file(Path::new("songs/castle.MML")));
        assert!(!is_mml_file(Path::new("songs/castle.brr")));
        assert!(!is_mml_file(Path::new("songs/README")));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_scanner(Path::new("does/not/exist.txt"), &[]).unwrap_err();
        assert_eq!(err.error_type(), crate::ErrorType::Io);
    }
}
