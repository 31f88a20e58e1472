//! Token stream finalization.
//!
//! One rewrite and one wrapping step run after indentation processing:
//! any NEWLINE that directly precedes ELIF or ELSE is dropped, so the
//! parser can treat a whole multi-arm conditional as a single production,
//! and the stream is bracketed with START_TOKEN/END_TOKEN sentinels. The
//! result is exposed through a pull-style reader.

use crate::token::{Token, TokenKind};

/// Applies the NEWLINE rewrite and wraps the stream in sentinels.
pub fn finalize(tokens: Vec<Token>) -> Vec<Token> {
    // drop NEWLINE immediately followed by ELIF or ELSE
    let mut finalized: Vec<Token> = Vec::with_capacity(tokens.len() + 2);
    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        if token.kind == TokenKind::Newline {
            if let Some(next) = iter.peek() {
                if matches!(next.kind, TokenKind::Elif | TokenKind::Else) {
                    continue;
                }
            }
        }
        finalized.push(token);
    }

    let end_line = finalized.last().map(|t| t.line).unwrap_or(1);
    finalized.insert(0, Token::new(TokenKind::StartToken, 1, 0));
    finalized.push(Token::new(TokenKind::EndToken, end_line, 0));
    finalized
}

/// Pull-style reader over a finalized token vector.
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
}

impl TokenStream {
    /// Wraps a finalized token vector.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
        }
    }

    /// Yields the next token, or `None` when exhausted.
    pub fn next_token(&mut self) -> Option<Token> {
        self.tokens.next()
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indent::add_indentations;
    use crate::lexer::Lexer;
    use adderc_util::Handler;

    fn finalize_source(source: &str) -> Vec<Token> {
        let handler = Handler::new();
        let raw = Lexer::new(source, &handler).scan().expect("scan failed");
        let indented = add_indentations(raw, &handler).expect("indentation failed");
        finalize(indented)
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        finalize_source(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_sentinels_wrap_stream() {
        let kinds = kinds("a = 1\n");
        assert_eq!(kinds.first(), Some(&TokenKind::StartToken));
        assert_eq!(kinds.last(), Some(&TokenKind::EndToken));
    }

    #[test]
    fn test_empty_input_still_wrapped() {
        let kinds = kinds("");
        assert_eq!(kinds, vec![TokenKind::StartToken, TokenKind::EndToken]);
    }

    #[test]
    fn test_newline_before_else_dropped() {
        let source = "if x:\n    a = 1\nelse:\n    a = 2\n";
        let kinds = kinds(source);
        let else_at = kinds.iter().position(|k| *k == TokenKind::Else).unwrap();
        assert_ne!(kinds[else_at - 1], TokenKind::Newline);
        assert_eq!(kinds[else_at - 1], TokenKind::Dedent);
    }

    #[test]
    fn test_newline_before_elif_dropped() {
        let source = "if x:\n    a = 1\nelif y:\n    a = 2\n";
        let kinds = kinds(source);
        let elif_at = kinds.iter().position(|k| *k == TokenKind::Elif).unwrap();
        assert_eq!(kinds[elif_at - 1], TokenKind::Dedent);
    }

    #[test]
    fn test_other_newlines_survive() {
        let kinds = kinds("a = 1\nb = 2\n");
        let newlines = kinds.iter().filter(|k| **k == TokenKind::Newline).count();
        assert_eq!(newlines, 2);
    }

    #[test]
    fn test_end_token_carries_last_line() {
        let tokens = finalize_source("a = 1\nb = 2\n");
        assert_eq!(tokens.last().unwrap().line, 2);
    }

    #[test]
    fn test_pull_api_drains_then_none() {
        let mut stream = TokenStream::new(finalize_source("a = 1\n"));
        let mut count = 0;
        while stream.next_token().is_some() {
            count += 1;
        }
        assert_eq!(count, 6); // START NAME EQUAL INT NEWLINE END
        assert!(stream.next_token().is_none());
    }
}
