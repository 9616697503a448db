// tests/scanner_tests.rs
//
// Behavioural contract of the macro-expanding scanner, exercised through the
// public API only.

use amkscan::{ErrorType, PatternCache, Scanner};

// ---
// Plain scanning (empty macro table)
// ---

#[test]
fn test_no_macros_trim_matches_raw_text() {
    let text = "o4 c8 d+16 ; comment\n";
    let cache = PatternCache::new();
    let mut scanner = Scanner::with_patterns(text, cache.clone());

    for pattern in [r"o[0-9]", r"\s+", r"[a-g][+-]?[0-9]*", r"\s*"] {
        let expected = cache
            .compile(pattern, false)
            .unwrap()
            .match_prefix(scanner.remaining())
            .map(|len| scanner.remaining()[..len].to_string());
        let actual = scanner.trim(pattern).unwrap().map(str::to_string);
        assert_eq!(actual, expected, "pattern {pattern}");
    }

    let before = scanner.remaining().to_string();
    let (start, end) = cache
        .compile(";", false)
        .unwrap()
        .find(&before)
        .unwrap();
    assert_eq!(scanner.trim_until(";").unwrap(), Some(&before[..start]));
    assert_eq!(scanner.remaining(), &before[end..]);
}

#[test]
fn test_trim_until_without_match_consumes_nothing() {
    let mut scanner = Scanner::new("abc def");
    assert_eq!(scanner.trim_until("xyz").unwrap(), None);
    assert_eq!(scanner.remaining(), "abc def");
}

#[test]
fn test_trim_until_ignore_case() {
    let mut scanner = Scanner::new("c d E f");
    assert_eq!(scanner.trim_until_with("e", true).unwrap(), Some("c d "));
    assert_eq!(scanner.remaining(), " f");
}

// ---
// Backtracking
// ---

#[test]
fn test_undo_restores_exact_view() {
    let mut scanner = Scanner::new("123abc");
    assert_eq!(scanner.trim(r"\d+").unwrap(), Some("123"));
    assert_eq!(scanner.remaining(), "abc");
    scanner.undo();
    assert_eq!(scanner.remaining(), "123abc");
    scanner.undo();
    assert_eq!(scanner.remaining(), "123abc");
}

#[test]
fn test_queries_do_not_touch_snapshot() {
    let mut scanner = Scanner::new("ab");
    assert!(scanner.trim_char('a'));
    let _ = scanner.current_line();
    let _ = scanner.read_offset();
    let _ = scanner.is_exhausted();
    let _ = scanner.peek();
    scanner.undo();
    assert_eq!(scanner.remaining(), "ab");
}

// ---
// Two-pass replay
// ---

#[test]
fn test_reset_to_root_replays_identically() {
    let mut scanner = Scanner::new("abc def");
    let mut first = Vec::new();
    for _ in 0..2 {
        assert!(scanner.next_token_available().unwrap());
        first.push((
            scanner.trim("[a-z]+").unwrap().map(str::to_string),
            scanner.current_line(),
        ));
    }
    assert_eq!(first[0].0.as_deref(), Some("abc"));
    assert_eq!(first[1].0.as_deref(), Some("def"));

    scanner.reset_to_root(0);
    let mut second = Vec::new();
    for _ in 0..2 {
        assert!(scanner.next_token_available().unwrap());
        second.push((
            scanner.trim("[a-z]+").unwrap().map(str::to_string),
            scanner.current_line(),
        ));
    }
    assert_eq!(first, second);
}

#[test]
fn test_reset_to_root_from_inside_a_macro() {
    let mut scanner = Scanner::new("M\nz");
    scanner.define("M", "x\ny");
    assert!(scanner.next_token_available().unwrap());
    assert!(scanner.trim_char('x'));
    assert!(scanner.next_token_available().unwrap());
    assert_eq!(scanner.current_line(), 2);
    assert_eq!(scanner.depth(), 1);

    scanner.reset_to_root(0);
    assert_eq!(scanner.depth(), 0);
    assert_eq!(scanner.buffer(), "M\nz");
    assert_eq!(scanner.remaining(), "M\nz");
}

#[test]
fn test_drain_marks_everything_consumed() {
    let mut scanner = Scanner::new("c d e");
    scanner.drain();
    assert!(scanner.is_exhausted());
    assert!(!scanner.next_token_available().unwrap());
}

// ---
// Macro expansion
// ---

#[test]
fn test_self_referencing_macro_is_a_cycle() {
    let mut scanner = Scanner::new("A");
    scanner.define("A", "xA");
    assert!(scanner.next_token_available().unwrap());
    assert!(scanner.trim_char('x'));
    let err = scanner.next_token_available().unwrap_err();
    assert_eq!(err.error_type(), ErrorType::MacroCycle);
}

#[test]
fn test_macro_expanding_straight_into_itself_is_a_cycle() {
    let mut scanner = Scanner::new("B");
    scanner.define("B", "B");
    let err = scanner.next_token_available().unwrap_err();
    assert_eq!(err.error_type(), ErrorType::MacroCycle);
    assert_eq!(err.line(), Some(1));
}

#[test]
fn test_longest_key_is_selected() {
    let mut scanner = Scanner::new("LOOP1");
    scanner.define("LP", "X");
    scanner.define("LOOP", "Y");
    assert!(scanner.next_token_available().unwrap());
    assert_eq!(scanner.active_macros(), vec!["LOOP"]);
    assert_eq!(scanner.remaining(), "Y");
    assert!(scanner.trim_char('Y'));
    assert!(scanner.next_token_available().unwrap());
    assert_eq!(scanner.remaining(), "1");
    assert_eq!(scanner.depth(), 0);
}

#[test]
fn test_whitespace_macro_crosses_back_into_parent() {
    let mut scanner = Scanner::new("Q  rest");
    scanner.define("Q", "  ");
    assert!(scanner.next_token_available().unwrap());
    assert_eq!(scanner.remaining(), "rest");
    assert_eq!(scanner.depth(), 0);
    assert_eq!(scanner.trim("rest").unwrap(), Some("rest"));
}

#[test]
fn test_same_key_may_expand_again_after_its_frame_pops() {
    let mut scanner = Scanner::new("K K");
    scanner.define("K", "k");
    for _ in 0..2 {
        assert!(scanner.next_token_available().unwrap());
        assert!(scanner.trim_char('k'));
    }
    assert!(!scanner.next_token_available().unwrap());
}

#[test]
fn test_redefinition_last_wins() {
    let mut scanner = Scanner::new("V");
    scanner.define("V", "v100");
    scanner.define("V", "v200");
    assert!(scanner.next_token_available().unwrap());
    assert_eq!(scanner.remaining(), "v200");
}

// ---
// Positions
// ---

#[test]
fn test_line_counting() {
    let mut scanner = Scanner::new("a\nb\nc");
    assert_eq!(scanner.current_line(), 1);
    assert_eq!(scanner.trim_until("\n").unwrap(), Some("a"));
    assert_eq!(scanner.trim_until("\n").unwrap(), Some("b"));
    assert_eq!(scanner.current_line(), 3);
}

#[test]
fn test_line_inside_macro_is_relative_to_replacement() {
    let mut scanner = Scanner::new("\n\n\nM");
    scanner.define("M", "c");
    assert!(scanner.next_token_available().unwrap());
    assert_eq!(scanner.current_line(), 1);
}

#[test]
fn test_byte_order_mark_is_stripped_once() {
    let mut scanner = Scanner::new("\u{FEFF}\u{FEFF}x");
    assert_eq!(scanner.read_offset(), 0);
    assert_eq!(scanner.peek(), Some('\u{FEFF}'));
    scanner.reset_to_root(0);
    assert_eq!(scanner.remaining(), "\u{FEFF}x");
}

#[test]
fn test_seek_is_undoable_but_reposition_is_not() {
    let mut scanner = Scanner::new("0123456789");
    scanner.seek(5);
    scanner.undo();
    assert_eq!(scanner.read_offset(), 0);
    scanner.reposition(5);
    scanner.undo();
    assert_eq!(scanner.read_offset(), 5);
}
