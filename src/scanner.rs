//! # Macro-expanding scanner
//!
//! The compiler drives a [`Scanner`] by asking [`next_token_available`] before every
//! parse step. That call skips whitespace, expands any replacement macro whose key
//! prefixes the cursor (recursively, through nested buffers), skips whitespace
//! again, and reports whether anything is left to consume. Parse routines then
//! consume lexemes with [`trim`], [`trim_until`] and [`trim_char`], using pattern
//! text compiled through the scanner's [`PatternCache`].
//!
//! ## Buffers
//!
//! Exactly one buffer is active at a time: the source text, or the replacement text
//! of the innermost macro being expanded. Entering a macro swaps the buffer out
//! wholesale and records a [`MacroFrame`] with the enclosing text and the offset just
//! past the key. When whitespace skipping runs off the end of a replacement, the
//! frame is popped and scanning resumes in the enclosing buffer.
//!
//! ## Errors
//!
//! Only two conditions are fatal: a macro key re-entering the active stack
//! ([`ScanError::MacroCycle`]) and a pattern that fails to compile
//! ([`ScanError::InvalidPattern`]). "No match" is an empty `Option`.
//!
//! [`next_token_available`]: Scanner::next_token_available
//! [`trim`]: Scanner::trim
//! [`trim_until`]: Scanner::trim_until
//! [`trim_char`]: Scanner::trim_char

use std::sync::Arc;

use crate::diagnostics::{to_named_source, ScanError, ScanResult, Span};
use crate::err_ctx;
use crate::macros::{MacroCycle, MacroFrame, MacroStack, MacroTable};
use crate::pattern::PatternCache;
use crate::view::SourceView;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Scanner over one compilation unit's MML text.
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Source text with any byte-order mark removed.
    root: Arc<str>,
    view: SourceView,
    macros: MacroTable,
    stack: MacroStack,
    patterns: PatternCache,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new("")
    }
}

impl Scanner {
    /// Creates a scanner with its own pattern cache.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use amkscan::Scanner;
    /// let mut scanner = Scanner::new("\u{FEFF}t60 c4");
    /// assert_eq!(scanner.trim("t[0-9]+").unwrap(), Some("t60"));
    /// ```
    pub fn new(source: &str) -> Self {
        Self::with_patterns(source, PatternCache::new())
    }

    /// Creates a scanner that compiles patterns through a shared cache.
    pub fn with_patterns(source: &str, patterns: PatternCache) -> Self {
        let text = source.strip_prefix(BYTE_ORDER_MARK).unwrap_or(source);
        let root: Arc<str> = Arc::from(text);
        Self {
            view: SourceView::new(Arc::clone(&root)),
            root,
            macros: MacroTable::new(),
            stack: MacroStack::new(),
            patterns,
        }
    }

    // =============================
    // Lexeme consumption
    // =============================

    /// Consumes the match of `pattern` anchored at the cursor.
    pub fn trim(&mut self, pattern: &str) -> ScanResult<Option<&str>> {
        self.trim_with(pattern, false)
    }

    pub fn trim_with(&mut self, pattern: &str, ignore_case: bool) -> ScanResult<Option<&str>> {
        let compiled = self.patterns.compile(pattern, ignore_case)?;
        Ok(self.view.trim(&compiled))
    }

    /// Consumes everything through the first match of `pattern`, returning the text
    /// before the match. The match itself is discarded.
    pub fn trim_until(&mut self, pattern: &str) -> ScanResult<Option<&str>> {
        self.trim_until_with(pattern, false)
    }

    pub fn trim_until_with(
        &mut self,
        pattern: &str,
        ignore_case: bool,
    ) -> ScanResult<Option<&str>> {
        let compiled = self.patterns.compile(pattern, ignore_case)?;
        Ok(self.view.trim_until(&compiled))
    }

    /// Consumes one character if it is `expected`.
    pub fn trim_char(&mut self, expected: char) -> bool {
        self.view.trim_char(expected)
    }

    /// Restores the view to where it was before the last consuming operation.
    pub fn undo(&mut self) {
        self.view.undo();
    }

    // =============================
    // Position queries
    // =============================

    pub fn is_exhausted(&self) -> bool {
        self.view.is_exhausted()
    }

    /// Byte offset of the cursor in the active buffer.
    pub fn read_offset(&self) -> usize {
        self.view.read_offset()
    }

    /// Moves the cursor within the active buffer; the move cannot be undone.
    pub fn reposition(&mut self, offset: usize) {
        self.view.reposition(offset);
    }

    /// Moves the cursor within the active buffer; `undo` returns to the old spot.
    pub fn seek(&mut self, offset: usize) {
        self.view.seek(offset);
    }

    pub fn remaining(&self) -> &str {
        self.view.remaining()
    }

    pub fn peek(&self) -> Option<char> {
        self.view.peek()
    }

    /// The active buffer: source text, or the innermost macro's replacement.
    pub fn buffer(&self) -> &str {
        self.view.buffer()
    }

    /// The source text the scanner was built from, minus any byte-order mark.
    pub fn source(&self) -> &str {
        &self.root
    }

    /// 1-based line of the cursor, counted within the active buffer.
    ///
    /// Inside a macro expansion this is a line of the replacement text, not of the
    /// source.
    pub fn current_line(&self) -> usize {
        self.view.line_number()
    }

    // =============================
    // Macro table and stack
    // =============================

    /// Defines or redefines a replacement macro. The last definition wins.
    pub fn define(&mut self, key: &str, replacement: &str) {
        if self.macros.define(key, replacement).is_some() {
            tracing::debug!(key, "replacement macro redefined");
        }
    }

    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    pub fn patterns(&self) -> &PatternCache {
        &self.patterns
    }

    /// Number of expansions in progress.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Keys of the expansions in progress, outermost first.
    pub fn active_macros(&self) -> Vec<&str> {
        self.stack.keys().collect()
    }

    /// Starts expanding `key` at the cursor. Fails if `key` is already being
    /// expanded anywhere on the stack.
    pub fn try_enter_macro(&mut self, key: &str, replacement: impl Into<Arc<str>>) -> bool {
        let frame = MacroFrame {
            key: key.to_string(),
            enclosing: Arc::clone(self.view.buffer()),
            resume_offset: self.view.read_offset() + key.len(),
        };
        let resume_offset = frame.resume_offset;
        if !self.stack.push(frame) {
            return false;
        }
        self.view.replace_buffer(replacement.into());
        tracing::debug!(key, depth = self.stack.depth(), resume_offset, "entered macro");
        true
    }

    /// Pops the innermost expansion and resumes the enclosing buffer just after the
    /// key that started it. Returns `false` when no expansion is active.
    pub fn exit_macro(&mut self) -> bool {
        let Some(frame) = self.stack.pop() else {
            return false;
        };
        self.view.replace_buffer(frame.enclosing);
        self.view.reposition(frame.resume_offset);
        tracing::debug!(key = %frame.key, depth = self.stack.depth(), "exited macro");
        true
    }

    /// Expands macros at the cursor until no key prefixes it. Replacement text that
    /// itself starts with a key is expanded in turn.
    ///
    /// Returns the number of expansions performed, or the cycle that stopped it.
    pub fn expand_macros_at_cursor(&mut self) -> Result<usize, MacroCycle> {
        let mut expanded = 0;
        loop {
            let Some((key, replacement)) = self
                .macros
                .find_longest_prefix_match(self.view.remaining())
                .map(|(key, repl)| (key.to_string(), Arc::clone(repl)))
            else {
                return Ok(expanded);
            };
            if !self.try_enter_macro(&key, replacement) {
                return Err(MacroCycle {
                    key,
                    chain: self.stack.keys().map(String::from).collect(),
                });
            }
            expanded += 1;
        }
    }

    // =============================
    // Orchestration
    // =============================

    /// Skips whitespace, popping exhausted expansions along the way. Returns whether
    /// any whitespace was consumed.
    pub fn skip_whitespace(&mut self) -> bool {
        let mut consumed = false;
        loop {
            consumed |= !self.view.trim_while(char::is_whitespace).is_empty();
            if !(self.view.is_exhausted() && self.exit_macro()) {
                return consumed;
            }
        }
    }

    /// True if there is content left to parse at the cursor. Whitespace is skipped
    /// and macros at the cursor are expanded first.
    ///
    /// # Errors
    ///
    /// [`ScanError::MacroCycle`] if a macro would expand into itself.
    pub fn next_token_available(&mut self) -> ScanResult<bool> {
        self.skip_whitespace();
        if let Err(cycle) = self.expand_macros_at_cursor() {
            return Err(self.cycle_error(&cycle));
        }
        self.skip_whitespace();
        Ok(!self.is_exhausted())
    }

    /// Abandons every expansion and moves to `offset` in the source text.
    pub fn reset_to_root(&mut self, offset: usize) {
        self.stack.clear();
        self.view.replace_buffer(Arc::clone(&self.root));
        self.view.reposition(offset);
        tracing::debug!(offset, "scanner reset to source");
    }

    /// Abandons every expansion and marks the source as fully consumed.
    pub fn drain(&mut self) {
        self.reset_to_root(self.root.len());
    }

    // =============================
    // Diagnostics
    // =============================

    /// Builds a `Syntax` error pointing at `start..end` in the active buffer.
    pub fn syntax_error(&self, message: impl Into<String>, start: usize, end: usize) -> ScanError {
        let message: String = message.into();
        let src = to_named_source(&self.buffer_name(), self.buffer());
        err_ctx!(
            Syntax,
            message,
            &src,
            Span::new(start, end),
            self.current_line()
        )
    }

    fn cycle_error(&self, cycle: &MacroCycle) -> ScanError {
        let src = to_named_source(&self.buffer_name(), self.buffer());
        let start = self.read_offset();
        err_ctx!(
            MacroCycle,
            format!("macro \"{}\" expands into itself", cycle.key),
            &src,
            Span::new(start, start + cycle.key.len()),
            self.current_line(),
            format!("expansion chain: {}", cycle)
        )
    }

    fn buffer_name(&self) -> String {
        match self.stack.keys().last() {
            Some(key) => format!("<macro \"{}\">", key),
            None => "source".to_string(),
        }
    }
}
