//! Active macro expansions.
//!
//! Entering a macro replaces the whole active buffer with the replacement text. The
//! frame pushed for it remembers the enclosing buffer and the offset just past the
//! invoking key, which is all that is needed to resume once the replacement is
//! exhausted.

use std::sync::Arc;

/// Saved state of the buffer that invoked a macro.
#[derive(Debug, Clone)]
pub struct MacroFrame {
    pub key: String,
    pub enclosing: Arc<str>,
    /// Offset in `enclosing` immediately after the key.
    pub resume_offset: usize,
}

/// Expansion frames, innermost last. No key appears twice.
#[derive(Debug, Clone, Default)]
pub struct MacroStack {
    frames: Vec<MacroFrame>,
}

impl MacroStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `key` names any active frame, not just the innermost.
    pub fn is_active(&self, key: &str) -> bool {
        self.frames.iter().any(|frame| frame.key == key)
    }

    /// Pushes `frame` unless its key is already active.
    pub fn push(&mut self, frame: MacroFrame) -> bool {
        if self.is_active(&frame.key) {
            return false;
        }
        self.frames.push(frame);
        true
    }

    pub fn pop(&mut self) -> Option<MacroFrame> {
        self.frames.pop()
    }

    /// Drops every frame without unwinding them.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Active keys, outermost first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|frame| frame.key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(key: &str) -> MacroFrame {
        MacroFrame {
            key: key.to_string(),
            enclosing: Arc::from("text"),
            resume_offset: key.len(),
        }
    }

    #[test]
    fn push_rejects_key_active_anywhere_on_stack() {
        let mut stack = MacroStack::new();
        assert!(stack.push(frame("A")));
        assert!(stack.push(frame("B")));
        assert!(!stack.push(frame("A")));
        assert!(!stack.push(frame("B")));
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn key_can_reappear_after_pop() {
        let mut stack = MacroStack::new();
        assert!(stack.push(frame("A")));
        assert_eq!(stack.pop().map(|f| f.key), Some("A".to_string()));
        assert!(stack.push(frame("A")));
    }

    #[test]
    fn keys_are_outermost_first() {
        let mut stack = MacroStack::new();
        stack.push(frame("outer"));
        stack.push(frame("inner"));
        assert_eq!(stack.keys().collect::<Vec<_>>(), vec!["outer", "inner"]);
        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.pop().is_none());
    }
}
