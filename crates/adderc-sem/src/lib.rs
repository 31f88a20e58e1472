//! adderc-sem - Semantic bookkeeping for the parser's grammar actions.
//!
//! The grammar actions of `adderc-par` call into the [`Checker`] as they
//! reduce: every name introduction, name use, callee, base class and
//! control-flow keyword passes through here. The checker owns:
//!
//! - the flat [`SymbolTable`] (builtins pre-installed as FUNCTION),
//! - the sentinel-delimited [`ScopeStack`],
//! - the undefined-function/class collectors (forward references are
//!   legal until end of input),
//! - the `loop`/`function`/`class` depth counters behind the context
//!   checks for `break`, `continue`, `pass`, `...` and `return`.
//!
//! Everything here works on interned [`Symbol`]s; the checker never sees
//! an AST node, which keeps this crate below the parser in the dependency
//! order. A fresh checker is built per parse, so no state leaks between
//! compilations.

pub mod builtins;
pub mod hints;
pub mod scope;
pub mod symbols;

pub use hints::HintBase;
pub use symbols::{SymbolKind, SymbolTable};

use adderc_util::{Category, CompileError, Handler, Symbol};
use indexmap::IndexMap;

use scope::ScopeStack;

/// What an assignment to a plain name turns into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignDisposition {
    /// First assignment in scope: a var_declare node.
    Declare,
    /// The name is already known: a plain assign node.
    Reassign,
}

/// Semantic state for one parse.
pub struct Checker<'a> {
    handler: &'a Handler,
    table: SymbolTable,
    scopes: ScopeStack,
    /// Callees used while unknown, with the line of first use.
    undefined_functions: IndexMap<Symbol, u32>,
    /// Base classes used while unknown, with the line of first use.
    undefined_classes: IndexMap<Symbol, u32>,
    loop_depth: u32,
    function_depth: u32,
    class_depth: u32,
}

impl<'a> Checker<'a> {
    /// Creates a fresh checker with only builtins defined.
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            handler,
            table: SymbolTable::new(),
            scopes: ScopeStack::new(),
            undefined_functions: IndexMap::new(),
            undefined_classes: IndexMap::new(),
            loop_depth: 0,
            function_depth: 0,
            class_depth: 0,
        }
    }

    // ======================== name introduction =========================

    /// Decides whether an assignment declares or reassigns `name`, and
    /// declares it on the spot in the first case.
    pub fn assign_target(&mut self, name: Symbol) -> AssignDisposition {
        if self.table.is_defined(name) {
            AssignDisposition::Reassign
        } else {
            self.table.insert(name, SymbolKind::Variable);
            self.scopes.record(name);
            AssignDisposition::Declare
        }
    }

    /// Declares a function parameter in the current scope.
    pub fn declare_parameter(&mut self, name: Symbol) {
        self.table.insert(name, SymbolKind::Variable);
        self.scopes.record(name);
    }

    /// Declares a for-loop target in the current scope.
    pub fn declare_loop_target(&mut self, name: Symbol) {
        self.table.insert(name, SymbolKind::Variable);
        self.scopes.record(name);
    }

    /// Declares a function name, resolving any pending callees.
    pub fn declare_function(&mut self, name: Symbol) {
        self.table.insert(name, SymbolKind::Function);
        self.scopes.record(name);
        self.undefined_functions.shift_remove(&name);
    }

    /// Declares a class name, resolving any pending base-class uses.
    pub fn declare_class(&mut self, name: Symbol) {
        self.table.insert(name, SymbolKind::Class);
        self.scopes.record(name);
        self.undefined_classes.shift_remove(&name);
    }

    // =========================== name lookup ============================

    /// The current kind of `name`, if any.
    pub fn symbol_kind(&self, name: Symbol) -> Option<SymbolKind> {
        self.table.kind(name)
    }

    /// Checks a name used in expression position.
    pub fn check_expression_name(&self, name: Symbol, line: u32) -> Result<(), CompileError> {
        if self.table.is_defined(name) {
            Ok(())
        } else {
            Err(self.handler.fatal(
                Category::Semantic,
                format!("undefined name '{}'", name),
                line,
            ))
        }
    }

    /// Checks the base of a dotted chain.
    ///
    /// `self` is allowed inside a class body even when undeclared.
    pub fn check_chain_base(&self, name: Symbol, line: u32) -> Result<(), CompileError> {
        if self.class_depth > 0 && name.as_str() == "self" {
            return Ok(());
        }
        self.check_expression_name(name, line)
    }

    /// Records a callee that is not (yet) a function or class.
    ///
    /// Calls never fail immediately; unresolved entries become fatal at
    /// end of input.
    pub fn track_callee(&mut self, name: Symbol, line: u32) {
        match self.table.kind(name) {
            Some(SymbolKind::Function) | Some(SymbolKind::Class) => {},
            _ => {
                self.undefined_functions.entry(name).or_insert(line);
            },
        }
    }

    /// Checks a base-class reference, tracking unknown names.
    ///
    /// Inheriting from the class being declared is fatal.
    pub fn track_base_class(
        &mut self,
        class_name: Symbol,
        parent: Symbol,
        line: u32,
    ) -> Result<(), CompileError> {
        if class_name == parent {
            return Err(self.handler.fatal(
                Category::Semantic,
                format!("class '{}' cannot inherit from itself", class_name),
                line,
            ));
        }
        if self.table.kind(parent) != Some(SymbolKind::Class) {
            self.undefined_classes.entry(parent).or_insert(line);
        }
        Ok(())
    }

    // ========================= scopes and depth =========================

    /// Pushes the scope-open sentinel.
    pub fn enter_scope(&mut self) {
        self.scopes.enter_scope();
    }

    /// Pops the current scope, clearing the names it introduced.
    pub fn exit_scope(&mut self) {
        self.scopes.exit_scope(&mut self.table);
    }

    pub fn enter_loop(&mut self) {
        self.loop_depth += 1;
    }

    pub fn exit_loop(&mut self) {
        self.loop_depth -= 1;
    }

    pub fn enter_function(&mut self) {
        self.function_depth += 1;
    }

    pub fn exit_function(&mut self) {
        self.function_depth -= 1;
    }

    pub fn enter_class(&mut self) {
        self.class_depth += 1;
    }

    pub fn exit_class(&mut self) {
        self.class_depth -= 1;
    }

    pub fn loop_depth(&self) -> u32 {
        self.loop_depth
    }

    pub fn function_depth(&self) -> u32 {
        self.function_depth
    }

    pub fn class_depth(&self) -> u32 {
        self.class_depth
    }

    // ========================== context checks ==========================

    /// `break` is legal only inside a loop.
    pub fn check_break(&self, line: u32) -> Result<(), CompileError> {
        if self.loop_depth > 0 {
            Ok(())
        } else {
            Err(self
                .handler
                .fatal(Category::Semantic, "'break' outside loop", line))
        }
    }

    /// `continue` is legal only inside a loop.
    pub fn check_continue(&self, line: u32) -> Result<(), CompileError> {
        if self.loop_depth > 0 {
            Ok(())
        } else {
            Err(self
                .handler
                .fatal(Category::Semantic, "'continue' outside loop", line))
        }
    }

    /// `pass` is legal inside a loop or a function.
    pub fn check_pass(&self, line: u32) -> Result<(), CompileError> {
        if self.loop_depth > 0 || self.function_depth > 0 {
            Ok(())
        } else {
            Err(self.handler.fatal(
                Category::Semantic,
                "'pass' outside loop or function",
                line,
            ))
        }
    }

    /// A `...` body is legal only inside a function.
    pub fn check_ellipsis(&self, line: u32) -> Result<(), CompileError> {
        if self.function_depth > 0 {
            Ok(())
        } else {
            Err(self
                .handler
                .fatal(Category::Semantic, "'...' outside function", line))
        }
    }

    /// `return` is legal only inside a function.
    pub fn check_return(&self, line: u32) -> Result<(), CompileError> {
        if self.function_depth > 0 {
            Ok(())
        } else {
            Err(self
                .handler
                .fatal(Category::Semantic, "'return' outside function", line))
        }
    }

    // =========================== type hints =============================

    /// Validates one hint unit: a base name with or without a bracketed
    /// element series.
    pub fn check_hint(
        &self,
        name: Symbol,
        has_elements: bool,
        line: u32,
    ) -> Result<(), CompileError> {
        let base = match HintBase::from_name(name.as_str()) {
            Some(base) => base,
            None => {
                return Err(self.handler.fatal(
                    Category::Semantic,
                    format!("unknown type hint '{}'", name),
                    line,
                ));
            },
        };

        if base.is_container() && !has_elements {
            return Err(self.handler.fatal(
                Category::Semantic,
                format!("container hint '{}' needs bracketed element types", name),
                line,
            ));
        }
        if !base.is_container() && has_elements {
            return Err(self.handler.fatal(
                Category::Semantic,
                format!("scalar hint '{}' takes no element types", name),
                line,
            ));
        }
        Ok(())
    }

    // ========================= end of input =============================

    /// Fails if any callee or base class never resolved.
    pub fn finish(&self, line: u32) -> Result<(), CompileError> {
        if !self.undefined_functions.is_empty() {
            let names: Vec<&str> = self
                .undefined_functions
                .keys()
                .map(|name| name.as_str())
                .collect();
            return Err(self.handler.fatal(
                Category::Semantic,
                format!("call to undefined function(s): {}", names.join(", ")),
                self.undefined_functions[0].min(line),
            ));
        }
        if !self.undefined_classes.is_empty() {
            let names: Vec<&str> = self
                .undefined_classes
                .keys()
                .map(|name| name.as_str())
                .collect();
            return Err(self.handler.fatal(
                Category::Semantic,
                format!("undefined base class(es): {}", names.join(", ")),
                self.undefined_classes[0].min(line),
            ));
        }
        Ok(())
    }

    /// Callees still unresolved, in first-use order.
    pub fn undefined_functions(&self) -> Vec<Symbol> {
        self.undefined_functions.keys().copied().collect()
    }

    /// Base classes still unresolved, in first-use order.
    pub fn undefined_classes(&self) -> Vec<Symbol> {
        self.undefined_classes.keys().copied().collect()
    }
}
