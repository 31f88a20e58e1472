//! Diagnostic reporting infrastructure.
//!
//! Compilation failures fall into four categories, one per pipeline stage
//! that can reject the input: lexical, indentation, parse and semantic.
//! Each failure is recorded as a [`Diagnostic`] on a [`Handler`] and also
//! propagated to the caller as a [`CompileError`]; there is no recovery,
//! the first fatal diagnostic ends the compilation.

use std::cell::RefCell;
use std::fmt;

use thiserror::Error;

/// The pipeline stage a diagnostic originates from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Unrecognized character or malformed literal.
    Lex,
    /// Off-side-rule violation.
    Indentation,
    /// The grammar rejected a token at its position.
    Parse,
    /// Name, scope or context misuse.
    Semantic,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Lex => write!(f, "lex"),
            Category::Indentation => write!(f, "indentation"),
            Category::Parse => write!(f, "parse"),
            Category::Semantic => write!(f, "semantic"),
        }
    }
}

/// A single recorded diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Which stage rejected the input.
    pub category: Category,
    /// Human-readable message.
    pub message: String,
    /// Source line the diagnostic points at (1-based).
    pub line: u32,
}

impl Diagnostic {
    /// Create a diagnostic for the given category.
    pub fn new(category: Category, message: impl Into<String>, line: u32) -> Self {
        Self {
            category,
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error at line {}: {}",
            self.category, self.line, self.message
        )
    }
}

/// Fatal compilation error, one variant per diagnostic category.
///
/// Phases return `Result<T, CompileError>` and propagate with `?`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("lex error at line {line}: {message}")]
    Lex { message: String, line: u32 },

    #[error("indentation error at line {line}: {message}")]
    Indentation { message: String, line: u32 },

    #[error("parse error at line {line}: {message}")]
    Parse { message: String, line: u32 },

    #[error("semantic error at line {line}: {message}")]
    Semantic { message: String, line: u32 },
}

impl CompileError {
    /// Build an error in the given category.
    pub fn new(category: Category, message: impl Into<String>, line: u32) -> Self {
        let message = message.into();
        match category {
            Category::Lex => CompileError::Lex { message, line },
            Category::Indentation => CompileError::Indentation { message, line },
            Category::Parse => CompileError::Parse { message, line },
            Category::Semantic => CompileError::Semantic { message, line },
        }
    }

    /// The category this error belongs to.
    pub fn category(&self) -> Category {
        match self {
            CompileError::Lex { .. } => Category::Lex,
            CompileError::Indentation { .. } => Category::Indentation,
            CompileError::Parse { .. } => Category::Parse,
            CompileError::Semantic { .. } => Category::Semantic,
        }
    }

    /// The source line the error points at.
    pub fn line(&self) -> u32 {
        match self {
            CompileError::Lex { line, .. }
            | CompileError::Indentation { line, .. }
            | CompileError::Parse { line, .. }
            | CompileError::Semantic { line, .. } => *line,
        }
    }

    /// The message without the category/line prefix.
    pub fn message(&self) -> &str {
        match self {
            CompileError::Lex { message, .. }
            | CompileError::Indentation { message, .. }
            | CompileError::Parse { message, .. }
            | CompileError::Semantic { message, .. } => message,
        }
    }
}

/// Collector for diagnostics produced during one compilation.
///
/// Interior-mutable so shared references into the pipeline can report
/// without threading `&mut` through every production.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new empty handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Record a diagnostic and return the matching fatal error.
    ///
    /// The usual call shape inside a phase is
    /// `return Err(handler.fatal(Category::Parse, msg, line))`.
    pub fn fatal(&self, category: Category, message: impl Into<String>, line: u32) -> CompileError {
        let message = message.into();
        self.emit(Diagnostic::new(category, message.clone(), line));
        CompileError::new(category, message, line)
    }

    /// Record a pre-built diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Check whether any diagnostic has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.borrow().is_empty()
    }

    /// Number of recorded diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Snapshot of all recorded diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drop all recorded diagnostics.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}
