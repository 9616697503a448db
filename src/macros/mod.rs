//! # Replacement macros
//!
//! MML replacement macros are plain text substitutions: when a defined key prefixes
//! the scan position, the scanner switches to the replacement text and comes back
//! to the invoking buffer once the replacement is consumed.
//!
//! - [`MacroTable`] holds the definitions in longest-key-first order.
//! - [`MacroStack`] holds one [`MacroFrame`] per expansion in progress and is the
//!   sole cycle check: a key may not be entered while it is already active.
//!
//! The expansion loop itself lives on [`Scanner`](crate::Scanner), since it moves
//! the view between buffers.

pub mod stack;
pub mod table;

pub use stack::{MacroFrame, MacroStack};
pub use table::{MacroKey, MacroTable};

/// A key that re-entered the active expansion stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroCycle {
    /// The key that was refused.
    pub key: String,
    /// Keys active when it was refused, outermost first.
    pub chain: Vec<String>,
}

impl std::fmt::Display for MacroCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.chain.join(" -> "), self.key)
    }
}
