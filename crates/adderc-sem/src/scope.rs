//! Sentinel-delimited scope stack.
//!
//! The stack records every identifier entered into the current scope,
//! interleaved with scope-open markers. Entering a `def`/`class`/`for`
//! suite pushes a marker; leaving it pops identifiers (clearing their
//! symbol-table entries) until the marker surfaces. Plain `if`/`while`
//! suites do not open a scope, so their names survive into the enclosing
//! block.

use adderc_util::Symbol;

use crate::symbols::SymbolTable;

/// One slot on the scope stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScopeEntry {
    /// Scope-open sentinel.
    Marker,
    /// An identifier introduced in the current scope.
    Name(Symbol),
}

/// Stack of identifiers delimited by scope-open sentinels.
#[derive(Debug, Default)]
pub struct ScopeStack {
    entries: Vec<ScopeEntry>,
}

impl ScopeStack {
    /// Creates an empty stack (module scope is implicit).
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Opens a new scope by pushing the sentinel.
    pub fn enter_scope(&mut self) {
        self.entries.push(ScopeEntry::Marker);
    }

    /// Records an identifier introduced in the current scope.
    pub fn record(&mut self, name: Symbol) {
        self.entries.push(ScopeEntry::Name(name));
    }

    /// Closes the current scope.
    ///
    /// Pops identifiers and clears their table entries until the matching
    /// sentinel is found and consumed. Panics if no scope is open - that
    /// is a parser bug, not a user error.
    pub fn exit_scope(&mut self, table: &mut SymbolTable) {
        loop {
            match self.entries.pop() {
                Some(ScopeEntry::Name(name)) => table.remove(name),
                Some(ScopeEntry::Marker) => return,
                None => panic!("scope exit without a matching scope entry"),
            }
        }
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| **entry == ScopeEntry::Marker)
            .count()
    }
}
