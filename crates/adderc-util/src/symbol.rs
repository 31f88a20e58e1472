//! String interning for identifier handling.
//!
//! A [`Symbol`] is a 4-byte handle to an interned string. Every identifier
//! the tokenizer produces is interned once, so the parser, checker and
//! generator compare names by index instead of by contents. Interned
//! strings live in a global table and are leaked to obtain `'static`
//! lifetime; the table only ever grows, which is acceptable for a process
//! that compiles a bounded amount of source.

use std::sync::{LazyLock, RwLock};

use ahash::RandomState;
use dashmap::DashMap;
use static_assertions::assert_eq_size;

/// Handle to an interned string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

assert_eq_size!(Symbol, u32);

impl Symbol {
    /// Intern a string, returning its stable handle.
    ///
    /// Interning the same contents twice returns the same symbol.
    pub fn intern(string: &str) -> Symbol {
        TABLE.intern(string)
    }

    /// The interned string contents.
    pub fn as_str(self) -> &'static str {
        TABLE.resolve(self.0)
    }

    /// The raw table index.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global string table.
static TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

/// Two-way interning table.
///
/// `map` answers "is this string known" without locking the reverse
/// direction; `strings` resolves an index back to its contents.
struct StringTable {
    map: DashMap<&'static str, u32, RandomState>,
    strings: RwLock<Vec<&'static str>>,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_hasher(RandomState::new()),
            strings: RwLock::new(Vec::new()),
        }
    }

    fn intern(&self, string: &str) -> Symbol {
        if let Some(entry) = self.map.get(string) {
            return Symbol(*entry);
        }

        let mut strings = self.strings.write().expect("interner lock poisoned");
        // A racing intern of the same string may have won; re-check under
        // the write lock so both callers agree on one index.
        if let Some(entry) = self.map.get(string) {
            return Symbol(*entry);
        }

        let leaked: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let index = strings.len() as u32;
        strings.push(leaked);
        self.map.insert(leaked, index);
        Symbol(index)
    }

    fn resolve(&self, index: u32) -> &'static str {
        self.strings.read().expect("interner lock poisoned")[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_string_same_symbol() {
        let a = Symbol::intern("count");
        let b = Symbol::intern("count");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_strings_differ() {
        assert_ne!(Symbol::intern("left"), Symbol::intern("right"));
    }

    #[test]
    fn test_as_str_round_trip() {
        let sym = Symbol::intern("tokenize");
        assert_eq!(sym.as_str(), "tokenize");
    }

    #[test]
    fn test_display_is_contents() {
        let sym = Symbol::intern("range");
        assert_eq!(format!("{}", sym), "range");
    }
}
