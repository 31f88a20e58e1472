//! adderc-lex - Lexical analysis for the Adder language.
//!
//! This crate turns a UTF-8 source buffer into the finalized token
//! sequence the parser consumes. Three stages run in order:
//!
//! 1. **Scanner** ([`Lexer`]) - classifies lexemes into the closed
//!    [`TokenKind`] vocabulary, tracks `()`/`[]`/`{}` nesting, and
//!    suppresses NEWLINE and line-start WHITESPACE inside brackets. That
//!    suppression is the whole continuation-line mechanism: no explicit
//!    line-joining markers exist.
//! 2. **Indentation processor** ([`indent::add_indentations`]) - applies
//!    the off-side rule, replacing the whitespace/newline texture with
//!    synthetic INDENT/DEDENT markers.
//! 3. **Finalizer** ([`stream::finalize`]) - drops NEWLINE before
//!    `elif`/`else`, wraps the stream in START/END sentinels, and hands
//!    out a pull-style [`TokenStream`].
//!
//! The first error in any stage aborts with a [`CompileError`]; lexical
//! failures use the `lex` category and off-side failures `indentation`.

pub mod cursor;
pub mod indent;
pub mod lexer;
pub mod stream;
pub mod token;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use stream::TokenStream;
pub use token::{Token, TokenKind, TokenValue};

use adderc_util::{CompileError, Handler};

/// Runs the full lexical pipeline on one source buffer.
///
/// Returns the finalized token vector: scanned, indentation-processed,
/// rewritten and wrapped in START/END sentinels.
pub fn lex(source: &str, handler: &Handler) -> Result<Vec<Token>, CompileError> {
    let raw = Lexer::new(source, handler).scan()?;
    let indented = indent::add_indentations(raw, handler)?;
    Ok(stream::finalize(indented))
}

/// Runs the full lexical pipeline and wraps the result in a pull reader.
pub fn lex_stream(source: &str, handler: &Handler) -> Result<TokenStream, CompileError> {
    Ok(TokenStream::new(lex(source, handler)?))
}
