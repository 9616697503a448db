//! The replacement directive: `"key=replacement"`.
//!
//! This is how MML authors define macros. The key is trimmed of surrounding
//! whitespace; the replacement is kept exactly as written so that a macro can
//! expand to whitespace or to text with leading spaces.

use crate::{ScanResult, Scanner};

/// Parses a replacement directive at the cursor and defines the macro.
///
/// Returns `Ok(false)` without consuming anything if the cursor is not at a `"`.
///
/// # Examples
///
/// ```rust
/// use amkscan::{directive, Scanner};
/// let mut scanner = Scanner::new("\"V=v200\" V c4");
/// assert!(directive::parse_replacement(&mut scanner).unwrap());
/// assert_eq!(scanner.macros().get("V").map(|r| &**r), Some("v200"));
/// ```
pub fn parse_replacement(scanner: &mut Scanner) -> ScanResult<bool> {
    let start = scanner.read_offset();
    let Some(body) = scanner.get_escaped_string()? else {
        return Ok(false);
    };
    let end = scanner.read_offset();

    match split_replacement(&body) {
        Ok((key, replacement)) => {
            scanner.define(key, replacement);
            Ok(true)
        }
        Err(message) => Err(scanner.syntax_error(message, start, end)),
    }
}

/// Splits a directive body at its first `=`.
pub fn split_replacement(body: &str) -> Result<(&str, &str), &'static str> {
    let (key, replacement) = body
        .split_once('=')
        .ok_or("replacement directive is missing `=`")?;
    let key = key.trim();
    if key.is_empty() {
        return Err("replacement directive has an empty key");
    }
    Ok((key, replacement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorType;

    #[test]
    fn split_trims_key_only() {
        assert_eq!(split_replacement(" T1 = @1"), Ok(("T1", " @1")));
        assert_eq!(split_replacement("a=b=c"), Ok(("a", "b=c")));
        assert_eq!(split_replacement("Q=  "), Ok(("Q", "  ")));
    }

    #[test]
    fn split_rejects_malformed_bodies() {
        assert!(split_replacement("novalue").is_err());
        assert!(split_replacement("  =x").is_err());
    }

    #[test]
    fn not_at_a_quote_consumes_nothing() {
        let mut scanner = Scanner::new("c4");
        assert!(!parse_replacement(&mut scanner).unwrap());
        assert_eq!(scanner.remaining(), "c4");
    }

    #[test]
    fn malformed_directive_points_at_the_string() {
        let mut scanner = Scanner::new("\"oops\"");
        let err = parse_replacement(&mut scanner).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Syntax);
        assert!(err.to_string().contains("missing `=`"));
    }

    #[test]
    fn definition_then_use() {
        let mut scanner = Scanner::new("\"LOOP=[c d]2\" LOOP");
        assert!(parse_replacement(&mut scanner).unwrap());
        assert!(scanner.next_token_available().unwrap());
        assert_eq!(scanner.remaining(), "[c d]2");
        assert_eq!(scanner.active_macros(), vec!["LOOP"]);
    }
}
