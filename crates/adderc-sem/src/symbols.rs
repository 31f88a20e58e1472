//! Flat symbol table.
//!
//! Maps each known identifier to its kind. Absence is an explicit
//! condition callers test for; there is no defaulting. Scoping is not
//! this type's concern - the [`crate::scope::ScopeStack`] decides when
//! entries are removed.

use adderc_util::Symbol;
use rustc_hash::FxHashMap;

use crate::builtins::BUILTIN_FUNCTIONS;

/// What a known identifier names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Class,
    Function,
    Variable,
}

/// Identifier-to-kind map with builtins pre-installed.
#[derive(Debug)]
pub struct SymbolTable {
    table: FxHashMap<Symbol, SymbolKind>,
}

impl SymbolTable {
    /// Creates a table holding only the builtin functions.
    pub fn new() -> Self {
        let mut table = FxHashMap::default();
        for name in BUILTIN_FUNCTIONS {
            table.insert(Symbol::intern(name), SymbolKind::Function);
        }
        Self { table }
    }

    /// The kind of `name`, if it is defined.
    pub fn kind(&self, name: Symbol) -> Option<SymbolKind> {
        self.table.get(&name).copied()
    }

    /// Whether `name` is defined at all.
    pub fn is_defined(&self, name: Symbol) -> bool {
        self.table.contains_key(&name)
    }

    /// Defines or re-kinds `name`.
    pub fn insert(&mut self, name: Symbol, kind: SymbolKind) {
        self.table.insert(name, kind);
    }

    /// Removes `name` from the table.
    pub fn remove(&mut self, name: Symbol) {
        self.table.remove(&name);
    }

    /// Number of defined names, builtins included.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when even the builtins are gone (never, in practice).
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
