//! Replacement-macro table.
//!
//! Keys are literal text prefixes, not patterns. The table is kept in its matching
//! order at all times: longest key first, ties broken by ascending key text. A
//! linear scan in that order therefore yields the longest key that prefixes the
//! view, and the choice between equal-length keys is deterministic.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

/// A macro key ordered by `(descending length, ascending text)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MacroKey(String);

impl MacroKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for MacroKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .len()
            .cmp(&self.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for MacroKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Mapping from macro key to replacement text.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct MacroTable {
    entries: BTreeMap<MacroKey, Arc<str>>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `key`. Returns the replacement it displaced, if any.
    pub fn define(&mut self, key: &str, replacement: &str) -> Option<Arc<str>> {
        self.entries
            .insert(MacroKey(key.to_string()), Arc::from(replacement))
    }

    pub fn get(&self, key: &str) -> Option<&Arc<str>> {
        self.entries.get(&MacroKey(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Longest key that is a literal prefix of `view`, with its replacement.
    pub fn find_longest_prefix_match(&self, view: &str) -> Option<(&str, &Arc<str>)> {
        self.entries
            .iter()
            .find(|(key, _)| view.starts_with(key.as_str()))
            .map(|(key, repl)| (key.as_str(), repl))
    }

    /// Keys in matching order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(MacroKey::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
