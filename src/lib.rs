//! # amkscan
//!
//! The source-scanning front end of an MML (music macro language) compiler. The
//! [`Scanner`] serves lexemes to the per-command parse routines while transparently
//! expanding replacement macros, choosing the longest matching key, refusing
//! cyclic expansions, allowing one step of backtracking, and tracking positions
//! across nested expansion buffers.

pub use crate::diagnostics::{ErrorContext, ErrorType, ScanError, ScanResult, Span};
pub use crate::macros::{MacroCycle, MacroTable};
pub use crate::pattern::{CompiledPattern, PatternCache};
pub use crate::scanner::Scanner;

pub mod cli;
pub mod diagnostics;
pub mod directive;
pub mod lexeme;
pub mod macros;
pub mod pattern;
pub mod scanner;
pub mod tokens;
pub mod view;
