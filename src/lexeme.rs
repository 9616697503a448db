//! Common lexeme readers shared by the MML parse routines.
//!
//! These are thin wrappers over [`Scanner::trim`] for the shapes almost every
//! command needs: integers, hex values, identifiers, directive words and quoted
//! strings. "Not present" is `Ok(None)` with the view unchanged; a lexeme that is
//! present but malformed (an integer that overflows, a string with no closing
//! quote) is a [`ScanError::Syntax`](crate::ScanError::Syntax).

use crate::{ScanResult, Scanner};

const INT_PATTERN: &str = "[0-9]+";
const SIGNED_INT_PATTERN: &str = "-?[0-9]+";
const HEX_PATTERN: &str = "[0-9A-Fa-f]+";
const HEX_BYTE_PATTERN: &str = "[0-9A-Fa-f]{2}";
const IDENTIFIER_PATTERN: &str = "[A-Za-z_][A-Za-z0-9_]*";

impl Scanner {
    /// Consumes `word` case-insensitively, e.g. `#amk` or `#SPC`.
    pub fn trim_directive(&mut self, word: &str) -> ScanResult<bool> {
        let pattern = regex_syntax::escape(word);
        Ok(self.trim_with(&pattern, true)?.is_some())
    }

    pub fn get_int(&mut self) -> ScanResult<Option<i32>> {
        self.read_number(INT_PATTERN, 10)
    }

    pub fn get_int_with_negative(&mut self) -> ScanResult<Option<i32>> {
        self.read_number(SIGNED_INT_PATTERN, 10)
    }

    pub fn get_hex(&mut self) -> ScanResult<Option<u32>> {
        let Some(digits) = self.trim(HEX_PATTERN)? else {
            return Ok(None);
        };
        let len = digits.len();
        let parsed = u32::from_str_radix(digits, 16);
        match parsed {
            Ok(value) => Ok(Some(value)),
            Err(e) => Err(self.overflow_error(len).with_cause(e)),
        }
    }

    /// Exactly two hex digits.
    pub fn get_hex_byte(&mut self) -> ScanResult<Option<u8>> {
        Ok(self
            .trim(HEX_BYTE_PATTERN)?
            .and_then(|digits| u8::from_str_radix(digits, 16).ok()))
    }

    pub fn get_identifier(&mut self) -> ScanResult<Option<String>> {
        Ok(self.trim(IDENTIFIER_PATTERN)?.map(str::to_string))
    }

    /// Reads a `"`-delimited string where `\"` and `\\` are escapes, returning the
    /// unescaped body. `undo` afterwards returns to before the opening quote.
    pub fn get_escaped_string(&mut self) -> ScanResult<Option<String>> {
        let start = self.read_offset();
        let Some(body) = self.remaining().strip_prefix('"') else {
            return Ok(None);
        };

        let mut text = String::new();
        let mut chars = body.char_indices();
        while let Some((i, ch)) = chars.next() {
            match ch {
                '"' => {
                    // opening quote + body + closing quote
                    self.seek(start + 1 + i + 1);
                    return Ok(Some(text));
                }
                '\\' => match chars.next() {
                    Some((_, escaped)) => text.push(escaped),
                    None => break,
                },
                _ => text.push(ch),
            }
        }

        let end = self.buffer().len();
        Err(self.syntax_error("unterminated string", start, end))
    }

    fn read_number(&mut self, pattern: &str, radix: u32) -> ScanResult<Option<i32>> {
        let Some(digits) = self.trim(pattern)? else {
            return Ok(None);
        };
        let len = digits.len();
        let parsed = i32::from_str_radix(digits, radix);
        match parsed {
            Ok(value) => Ok(Some(value)),
            Err(e) => Err(self.overflow_error(len).with_cause(e)),
        }
    }

    fn overflow_error(&self, len: usize) -> crate::ScanError {
        let end = self.read_offset();
        self.syntax_error("number is too large", end - len, end)
    }
}
