//! String literal lexing.
//!
//! Four forms share one vocabulary slot each: plain quoted strings,
//! triple-quoted strings (which may span lines), raw strings (`r` prefix)
//! and unicode strings (`u` prefix). The stored value is always the text
//! between the delimiters with the prefix stripped; escape sequences are
//! kept verbatim for the emitter to reproduce.

use adderc_util::CompileError;

use crate::token::{Token, TokenKind, TokenValue};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a plain or triple-quoted string.
    ///
    /// The cursor sits on the opening quote.
    pub(crate) fn lex_string(&mut self) -> Result<Token, CompileError> {
        let quote = self.cursor.advance();

        if self.cursor.current_char() == quote && self.cursor.peek_char(1) == quote {
            self.cursor.advance();
            self.cursor.advance();
            return self.lex_triple_string(quote);
        }

        let body = self.lex_single_line_body(quote)?;
        Ok(self.valued(TokenKind::String, TokenValue::Str(body)))
    }

    /// Lexes a raw (`r"..."`) or unicode (`u"..."`) string.
    ///
    /// The cursor sits on the prefix letter.
    pub(crate) fn lex_prefixed_string(&mut self, kind: TokenKind) -> Result<Token, CompileError> {
        self.cursor.advance(); // prefix letter
        let quote = self.cursor.advance();
        let body = self.lex_single_line_body(quote)?;
        Ok(self.valued(kind, TokenValue::Str(body)))
    }

    /// Lexes the body of a triple-quoted string.
    ///
    /// The three opening quotes have been consumed; newlines are allowed
    /// inside.
    fn lex_triple_string(&mut self, quote: char) -> Result<Token, CompileError> {
        let start = self.cursor.position();
        loop {
            if self.cursor.is_at_end() {
                return Err(self.error("unterminated triple-quoted string".to_string()));
            }
            if self.cursor.current_char() == quote
                && self.cursor.peek_char(1) == quote
                && self.cursor.peek_char(2) == quote
            {
                let body = self.cursor.slice_from(start);
                self.cursor.advance();
                self.cursor.advance();
                self.cursor.advance();
                return Ok(self.valued(TokenKind::TripleString, TokenValue::Str(body)));
            }
            self.cursor.advance();
        }
    }

    /// Consumes a single-line string body up to the closing quote.
    ///
    /// A backslash escapes the following character (including a newline,
    /// which continues the literal on the next physical line); a bare
    /// newline or end of input before the closing quote is fatal.
    fn lex_single_line_body(&mut self, quote: char) -> Result<String, CompileError> {
        let start = self.cursor.position();
        loop {
            let c = self.cursor.current_char();
            if self.cursor.is_at_end() || c == '\n' {
                return Err(self.error("unterminated string literal".to_string()));
            }
            if c == quote {
                let body = self.cursor.slice_from(start);
                self.cursor.advance();
                return Ok(body);
            }
            if c == '\\' {
                self.cursor.advance();
            }
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adderc_util::Handler;

    fn lex_one(source: &str) -> Token {
        let handler = Handler::new();
        Lexer::new(source, &handler)
            .scan()
            .expect("scan failed")
            .remove(0)
    }

    fn lex_err(source: &str) -> CompileError {
        let handler = Handler::new();
        Lexer::new(source, &handler)
            .scan()
            .expect_err("expected lex error")
    }

    #[test]
    fn test_double_quoted() {
        let token = lex_one("\"hello\"");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.value, TokenValue::Str("hello".to_string()));
    }

    #[test]
    fn test_single_quoted() {
        let token = lex_one("'world'");
        assert_eq!(token.kind, TokenKind::String);
        assert_eq!(token.value, TokenValue::Str("world".to_string()));
    }

    #[test]
    fn test_escaped_quote_does_not_terminate() {
        let token = lex_one(r#""a\"b""#);
        assert_eq!(token.value, TokenValue::Str("a\\\"b".to_string()));
    }

    #[test]
    fn test_triple_string_spans_lines() {
        let token = lex_one("\"\"\"line one\nline two\"\"\"");
        assert_eq!(token.kind, TokenKind::TripleString);
        assert_eq!(
            token.value,
            TokenValue::Str("line one\nline two".to_string())
        );
    }

    #[test]
    fn test_triple_single_quotes() {
        let token = lex_one("'''abc'''");
        assert_eq!(token.kind, TokenKind::TripleString);
        assert_eq!(token.value, TokenValue::Str("abc".to_string()));
    }

    #[test]
    fn test_raw_string() {
        let token = lex_one(r#"r"a\nb""#);
        assert_eq!(token.kind, TokenKind::RawString);
        assert_eq!(token.value, TokenValue::Str("a\\nb".to_string()));
    }

    #[test]
    fn test_unicode_string() {
        let token = lex_one("u'data'");
        assert_eq!(token.kind, TokenKind::UnicodeString);
        assert_eq!(token.value, TokenValue::Str("data".to_string()));
    }

    #[test]
    fn test_uppercase_prefixes() {
        assert_eq!(lex_one("R\"x\"").kind, TokenKind::RawString);
        assert_eq!(lex_one("U\"x\"").kind, TokenKind::UnicodeString);
    }

    #[test]
    fn test_unterminated_plain() {
        assert!(matches!(lex_err("\"open"), CompileError::Lex { .. }));
    }

    #[test]
    fn test_bare_newline_terminates_plain() {
        assert!(matches!(lex_err("\"a\nb\""), CompileError::Lex { .. }));
    }

    #[test]
    fn test_unterminated_triple() {
        assert!(matches!(lex_err("'''open"), CompileError::Lex { .. }));
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(lex_one("\"\"").value, TokenValue::Str(String::new()));
    }
}
