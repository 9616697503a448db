//! Compiled-pattern cache.
//!
//! Lexeme patterns are supplied as text by the parse routines and compiled on first
//! use. The cache is an explicit handle rather than ambient global state: every
//! [`Scanner`](crate::Scanner) owns one, and cloning a handle shares the same
//! entries, so several scanners (possibly on different threads) can reuse each
//! other's compiled patterns. First-time compilation happens under the lock.
//!
//! Patterns are compiled with the `regex-automata` meta engine. It uses
//! leftmost-first match semantics, which is what the MML parse routines expect
//! from alternations like `[0-9]+|\S`. The same compiled object serves anchored and
//! unanchored searches.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use regex_automata::meta::Regex;
use regex_automata::util::syntax;
use regex_automata::{Anchored, Input};

use crate::err_msg;
use crate::ScanResult;

/// A compiled, shareable pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Arc<Regex>,
    text: Arc<str>,
    ignore_case: bool,
}

impl CompiledPattern {
    /// The pattern text this object was compiled from.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Length of the match starting exactly at the beginning of `haystack`.
    pub fn match_prefix(&self, haystack: &str) -> Option<usize> {
        let input = Input::new(haystack).anchored(Anchored::Yes);
        self.regex.search(&input).map(|m| m.end())
    }

    /// Byte range of the first match anywhere in `haystack`.
    pub fn find(&self, haystack: &str) -> Option<(usize, usize)> {
        self.regex
            .search(&Input::new(haystack))
            .map(|m| (m.start(), m.end()))
    }

    /// True if both handles point at the same compiled object.
    pub fn same_as(&self, other: &CompiledPattern) -> bool {
        Arc::ptr_eq(&self.regex, &other.regex)
    }
}

type PatternKey = (String, bool);

/// Memoizing pattern compiler keyed by `(pattern text, ignore case)`.
///
/// Append-only: entries are never evicted for the lifetime of the handle.
#[derive(Debug, Clone, Default)]
pub struct PatternCache {
    entries: Arc<Mutex<HashMap<PatternKey, CompiledPattern>>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled form of `pattern`, compiling it on first request.
    ///
    /// An invalid pattern is a programming error in the caller and is reported as
    /// [`ScanError::InvalidPattern`](crate::ScanError::InvalidPattern); nothing is
    /// cached for it.
    pub fn compile(&self, pattern: &str, ignore_case: bool) -> ScanResult<CompiledPattern> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let key = (pattern.to_string(), ignore_case);
        if let Some(found) = entries.get(&key) {
            return Ok(found.clone());
        }

        tracing::trace!(pattern, ignore_case, "compiling pattern");
        let regex = Regex::builder()
            .syntax(syntax::Config::new().case_insensitive(ignore_case))
            .build(pattern)
            .map_err(|e| {
                err_msg!(InvalidPattern, "cannot compile pattern `{}`", pattern).with_cause(e)
            })?;
        let compiled = CompiledPattern {
            regex: Arc::new(regex),
            text: Arc::from(pattern),
            ignore_case,
        };
        entries.insert(key, compiled.clone());
        Ok(compiled)
    }

    /// Number of memoized patterns.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
