//! Generic token driver.
//!
//! Drives a [`Scanner`] the way the compiler does, without any per-command
//! knowledge: at each step it handles a replacement directive if one is present and
//! otherwise takes one generic lexeme (a digit run or a single non-space
//! character). It is used by the command line and to check that a second pass after
//! [`Scanner::reset_to_root`] sees exactly what the first pass saw.

use serde::Serialize;

use crate::{directive, ScanResult, Scanner};

/// A digit run, or any single non-whitespace character.
pub const LEXEME_PATTERN: &str = r"[0-9]+|\S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    /// Line within the buffer the token was read from.
    pub line: usize,
    /// Byte offset within that buffer.
    pub offset: usize,
    /// Number of macro expansions active when the token was read.
    pub depth: usize,
}

/// Scans to the end of input, defining macros from replacement directives on the
/// way.
pub fn scan_tokens(scanner: &mut Scanner) -> ScanResult<Vec<Token>> {
    let mut tokens = Vec::new();
    while scanner.next_token_available()? {
        if directive::parse_replacement(scanner)? {
            continue;
        }

        let line = scanner.current_line();
        let offset = scanner.read_offset();
        let depth = scanner.depth();
        let Some(text) = scanner.trim(LEXEME_PATTERN)? else {
            return Err(scanner.syntax_error("unrecognized input", offset, offset));
        };
        tokens.push(Token {
            text: text.to_string(),
            line,
            offset,
            depth,
        });
    }
    Ok(tokens)
}

/// Tokens from two passes over the same source.
#[derive(Debug, Clone, Serialize)]
pub struct Replay {
    pub first: Vec<Token>,
    pub second: Vec<Token>,
}

impl Replay {
    pub fn is_identical(&self) -> bool {
        self.first == self.second
    }

    /// Index of the first token that differs between the passes.
    pub fn first_divergence(&self) -> Option<usize> {
        if self.is_identical() {
            return None;
        }
        let common = self.first.len().min(self.second.len());
        Some(
            (0..common)
                .find(|&i| self.first[i] != self.second[i])
                .unwrap_or(common),
        )
    }
}

/// Scans once, rewinds with `reset_to_root(0)`, and scans again.
pub fn two_pass(scanner: &mut Scanner) -> ScanResult<Replay> {
    let first = scan_tokens(scanner)?;
    scanner.reset_to_root(0);
    let second = scan_tokens(scanner)?;
    Ok(Replay { first, second })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn digit_runs_and_single_characters() {
        let mut scanner = Scanner::new("t60 c4d8\n@12");
        let tokens = scan_tokens(&mut scanner).unwrap();
        assert_eq!(
            texts(&tokens),
            vec!["t", "60", "c", "4", "d", "8", "@", "12"]
        );
        assert_eq!(tokens[6].line, 2);
    }

    #[test]
    fn directives_define_macros_and_are_not_tokens() {
        let mut scanner = Scanner::new("\"V=v200\"\nV c");
        let tokens = scan_tokens(&mut scanner).unwrap();
        assert_eq!(texts(&tokens), vec!["v", "200", "c"]);
        assert_eq!(tokens[0].depth, 1);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[2].depth, 0);
        assert_eq!(tokens[2].line, 2);
    }

    #[test]
    fn macros_expand_mid_word() {
        let mut scanner = Scanner::new("c4T1d");
        scanner.define("T1", "@3");
        let tokens = scan_tokens(&mut scanner).unwrap();
        assert_eq!(texts(&tokens), vec!["c", "4", "@", "3", "d"]);
    }

    #[test]
    fn replay_is_identical() {
        let mut scanner = Scanner::new("\"A=o4 c\" A8 A16 r");
        let replay = two_pass(&mut scanner).unwrap();
        assert!(replay.is_identical());
        assert_eq!(replay.first_divergence(), None);
        assert_eq!(replay.first.len(), 9);
    }

    #[test]
    fn use_before_definition_diverges_on_replay() {
        let mut scanner = Scanner::new("X \"X=y\"");
        let replay = two_pass(&mut scanner).unwrap();
        assert!(!replay.is_identical());
        assert_eq!(replay.first_divergence(), Some(0));
    }
}
