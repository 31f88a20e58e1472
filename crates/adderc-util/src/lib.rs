//! adderc-util - Foundation types shared by every compiler phase.
//!
//! This crate holds the pieces that the lexer, parser, checker and code
//! generator all depend on:
//!
//! - [`Span`] - source locations (byte range plus 1-based line/column)
//! - [`Diagnostic`], [`Handler`], [`CompileError`] - diagnostic records,
//!   the collector they accumulate on, and the fatal error that aborts a
//!   phase
//! - [`Symbol`] - 4-byte handles to interned identifier strings
//!
//! Every phase reports failures the same way: it builds a [`Diagnostic`],
//! registers it on the [`Handler`], and propagates the matching
//! [`CompileError`] with `?`. The first fatal error ends the compilation;
//! the handler keeps the record for later reporting.

pub mod diagnostic;
pub mod span;
pub mod symbol;

pub use diagnostic::{Category, CompileError, Diagnostic, Handler};
pub use span::Span;
pub use symbol::Symbol;
