//! Handles all user-facing output for the CLI.
//!
//! Token listings, per-file check results and error reports are all written from
//! here so the commands share one look. Colour is used only when stdout is a
//! terminal.

use std::io::{IsTerminal, Write};
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::tokens::{Replay, Token};
use crate::{err_msg, ScanError, ScanResult};

/// Outcome of checking one file.
pub enum CheckStatus<'a> {
    Ok(&'a Replay),
    Diverged(&'a Replay),
    Failed(&'a ScanError),
}

fn stdout() -> StandardStream {
    let choice = if std::io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

fn io_error(e: std::io::Error) -> ScanError {
    err_msg!(Io, "cannot write output: {}", &e).with_cause(e)
}

/// Prints one token per line as `line:depth<TAB>text`.
pub fn print_tokens(tokens: &[Token]) -> ScanResult<()> {
    let mut out = stdout();
    for token in tokens {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))
            .map_err(io_error)?;
        write!(out, "{}:{}", token.line, token.depth).map_err(io_error)?;
        out.reset().map_err(io_error)?;
        writeln!(out, "\t{}", token.text).map_err(io_error)?;
    }
    Ok(())
}

pub fn print_tokens_json(tokens: &[Token]) -> ScanResult<()> {
    let json = serde_json::to_string_pretty(tokens)
        .map_err(|e| err_msg!(Io, "cannot serialize tokens: {}", &e).with_cause(e))?;
    writeln!(stdout(), "{}", json).map_err(io_error)
}

/// Prints a one-line verdict for `path`.
pub fn print_check(path: &Path, status: CheckStatus<'_>) -> ScanResult<()> {
    let mut out = stdout();
    let (color, label) = match status {
        CheckStatus::Ok(_) => (Color::Green, "ok"),
        CheckStatus::Diverged(_) => (Color::Yellow, "diverged"),
        CheckStatus::Failed(_) => (Color::Red, "error"),
    };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))
        .map_err(io_error)?;
    write!(out, "{:<8}", label).map_err(io_error)?;
    out.reset().map_err(io_error)?;

    let detail = match status {
        CheckStatus::Ok(replay) => format!("{} tokens", replay.first.len()),
        CheckStatus::Diverged(replay) => format!(
            "second pass differs at token {}",
            replay.first_divergence().unwrap_or_default()
        ),
        CheckStatus::Failed(err) => err.to_string(),
    };
    writeln!(out, " {} ({})", path.display(), detail).map_err(io_error)
}

/// Renders `err` through miette's fancy handler on stderr.
pub fn report_error(err: ScanError) {
    eprintln!("{:?}", miette::Report::new(err));
}
