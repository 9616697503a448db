// tests/directive_tests.rs

use amkscan::directive::parse_replacement;
use amkscan::tokens::{scan_tokens, two_pass};
use amkscan::{ErrorType, Scanner};

fn texts(scanner: &mut Scanner) -> Vec<String> {
    scan_tokens(scanner)
        .unwrap()
        .into_iter()
        .map(|t| t.text)
        .collect()
}

#[test]
fn test_directive_defines_verbatim_replacement() {
    let mut scanner = Scanner::new(r#""T = @1 v200""#);
    assert!(parse_replacement(&mut scanner).unwrap());
    assert_eq!(scanner.macros().get("T").map(|r| &**r), Some(" @1 v200"));
    assert!(scanner.is_exhausted());
}

#[test]
fn test_escaped_quote_inside_directive() {
    let mut scanner = Scanner::new(r#""Q=\"" Q"#);
    assert!(parse_replacement(&mut scanner).unwrap());
    assert_eq!(scanner.macros().get("Q").map(|r| &**r), Some("\""));
}

#[test]
fn test_unterminated_directive() {
    let mut scanner = Scanner::new("\"A=c4");
    let err = parse_replacement(&mut scanner).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Syntax);
}

#[test]
fn test_nested_definitions_expand_through_each_other() {
    let mut scanner = Scanner::new("\"B=c\"\n\"A=Bd\"\nA e");
    assert_eq!(texts(&mut scanner), vec!["c", "d", "e"]);
}

#[test]
fn test_longer_key_defined_later_still_wins() {
    let mut scanner = Scanner::new("\"L=x\" \"LOOP=y\" LOOP L");
    assert_eq!(texts(&mut scanner), vec!["y", "x"]);
}

#[test]
fn test_indirect_cycle_through_directives() {
    let mut scanner = Scanner::new("\"A=B\" \"B=A\" A");
    let err = scan_tokens(&mut scanner).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::MacroCycle);
}

#[test]
fn test_two_pass_with_directives_is_stable() {
    let mut scanner = Scanner::new("\"V=v255\"\n#0 V c4 V d4\n#1 V e2");
    let replay = two_pass(&mut scanner).unwrap();
    assert!(replay.is_identical());
    assert_eq!(replay.first.len(), replay.second.len());
}
