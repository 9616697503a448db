//! Defines the command-line arguments and subcommands for the amkscan CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "amkscan",
    version,
    about = "Scan MML sources with replacement-macro expansion."
)]
pub struct ScanArgs {
    /// Log scanner events (macro entry/exit, resets) to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the tokens of an MML file after macro expansion.
    Tokens {
        /// The MML file to scan.
        #[arg(required = true)]
        file: PathBuf,
        /// Predefine a replacement macro.
        #[arg(short = 'D', long = "define", value_name = "KEY=VALUE", value_parser = parse_define)]
        defines: Vec<(String, String)>,
        /// Emit the tokens as a JSON array.
        #[arg(long)]
        json: bool,
    },
    /// Scan every MML file under a path twice and check both passes agree.
    Check {
        /// A file, or a directory searched for `.txt` and `.mml` files.
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Predefine a replacement macro.
        #[arg(short = 'D', long = "define", value_name = "KEY=VALUE", value_parser = parse_define)]
        defines: Vec<(String, String)>,
    },
}

/// Parses `KEY=VALUE`. The key is trimmed; the value is kept as given.
fn parse_define(arg: &str) -> Result<(String, String), String> {
    crate::directive::split_replacement(arg)
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .map_err(str::to_string)
}
