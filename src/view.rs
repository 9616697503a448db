//! The active buffer and the unconsumed view into it.
//!
//! A [`SourceView`] owns the text currently being scanned plus a cursor; the view is
//! the suffix `buffer[cursor..]`. Every consuming operation first archives the
//! cursor into a one-slot snapshot so the caller can [`undo`](SourceView::undo) a
//! single step of lookahead.

use std::sync::Arc;

use crate::pattern::CompiledPattern;

#[derive(Debug, Clone)]
pub struct SourceView {
    buffer: Arc<str>,
    cursor: usize,
    /// Cursor before the most recent consuming operation.
    snapshot: Option<usize>,
}

impl Default for SourceView {
    fn default() -> Self {
        Self::new(Arc::from(""))
    }
}

impl SourceView {
    pub fn new(buffer: Arc<str>) -> Self {
        Self {
            buffer,
            cursor: 0,
            snapshot: Some(0),
        }
    }

    /// The whole active buffer.
    pub fn buffer(&self) -> &Arc<str> {
        &self.buffer
    }

    /// The unconsumed text.
    pub fn remaining(&self) -> &str {
        &self.buffer[self.cursor..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.buffer.len()
    }

    /// Cursor position as a byte offset from the start of the active buffer.
    pub fn read_offset(&self) -> usize {
        self.cursor
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Consumes the match of `pattern` anchored at the cursor.
    pub fn trim(&mut self, pattern: &CompiledPattern) -> Option<&str> {
        self.archive();
        let start = self.cursor;
        let len = pattern.match_prefix(&self.buffer[start..])?;
        self.cursor += len;
        Some(&self.buffer[start..start + len])
    }

    /// Consumes through the first match of `pattern` and returns the text before it.
    pub fn trim_until(&mut self, pattern: &CompiledPattern) -> Option<&str> {
        self.archive();
        let start = self.cursor;
        let (match_start, match_end) = pattern.find(&self.buffer[start..])?;
        self.cursor += match_end;
        Some(&self.buffer[start..start + match_start])
    }

    /// Consumes one character if it equals `expected`.
    pub fn trim_char(&mut self, expected: char) -> bool {
        self.archive();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.cursor += ch.len_utf8();
                true
            }
            _ => false,
        }
    }

    /// Consumes the longest run of characters satisfying `pred`, returning it.
    pub fn trim_while(&mut self, pred: impl Fn(char) -> bool) -> &str {
        self.archive();
        let start = self.cursor;
        let rest = &self.buffer[start..];
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.cursor += len;
        &self.buffer[start..start + len]
    }

    /// Restores the view captured before the last consuming operation.
    pub fn undo(&mut self) {
        if let Some(prev) = self.snapshot {
            self.cursor = prev;
        }
    }

    /// Moves the cursor to `offset` and makes that the new snapshot.
    pub fn reposition(&mut self, offset: usize) {
        self.cursor = self.clamp(offset);
        self.snapshot = Some(self.cursor);
    }

    /// Moves the cursor to `offset`, keeping the old position undoable.
    pub fn seek(&mut self, offset: usize) {
        self.archive();
        self.cursor = self.clamp(offset);
    }

    /// Swaps in a new active buffer, cursor at its start, returning the old one.
    pub fn replace_buffer(&mut self, buffer: Arc<str>) -> Arc<str> {
        let old = std::mem::replace(&mut self.buffer, buffer);
        self.reposition(0);
        old
    }

    /// `1 + newlines in buffer - newlines in view`.
    pub fn line_number(&self) -> usize {
        let consumed = &self.buffer[..self.cursor];
        1 + consumed.bytes().filter(|&b| b == b'\n').count()
    }

    fn archive(&mut self) {
        self.snapshot = Some(self.cursor);
    }

    fn clamp(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.buffer.len());
        while !self.buffer.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}
