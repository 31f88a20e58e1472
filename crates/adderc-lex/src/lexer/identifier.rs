//! Identifier and keyword lexing.

use adderc_util::Symbol;

use crate::token::{Token, TokenKind, TokenValue};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an identifier, reclassifying reserved words by table lookup.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);

        match TokenKind::keyword(&text) {
            Some(kind) => self.simple(kind),
            None => self.valued(TokenKind::Name, TokenValue::Name(Symbol::intern(&text))),
        }
    }
}

/// True for characters that may continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}
