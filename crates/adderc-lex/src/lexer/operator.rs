//! Operator lexing.
//!
//! Multi-character operators resolve by longest match: each entry point
//! consumes its lead character and then probes for the longer forms.

use adderc_util::CompileError;

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes `+` or `+=`.
    pub(crate) fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.simple(TokenKind::PlusEqual)
        } else {
            self.simple(TokenKind::Plus)
        }
    }

    /// Lexes `-`, `->` or `-=`.
    pub(crate) fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            self.simple(TokenKind::Arrow)
        } else if self.cursor.match_char('=') {
            self.simple(TokenKind::MinusEqual)
        } else {
            self.simple(TokenKind::Minus)
        }
    }

    /// Lexes `*`, `*=`, `**` or `**=`.
    pub(crate) fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('*') {
            if self.cursor.match_char('=') {
                self.simple(TokenKind::DoubleStarEqual)
            } else {
                self.simple(TokenKind::DoubleStar)
            }
        } else if self.cursor.match_char('=') {
            self.simple(TokenKind::StarEqual)
        } else {
            self.simple(TokenKind::Star)
        }
    }

    /// Lexes `/`, `/=`, `//` or `//=`.
    pub(crate) fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('/') {
            if self.cursor.match_char('=') {
                self.simple(TokenKind::DoubleSlashEqual)
            } else {
                self.simple(TokenKind::DoubleSlash)
            }
        } else if self.cursor.match_char('=') {
            self.simple(TokenKind::SlashEqual)
        } else {
            self.simple(TokenKind::Slash)
        }
    }

    /// Lexes `%` or `%=`.
    pub(crate) fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.simple(TokenKind::ModEqual)
        } else {
            self.simple(TokenKind::Mod)
        }
    }

    /// Lexes `=` or `==`.
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.simple(TokenKind::EqualEqual)
        } else {
            self.simple(TokenKind::Equal)
        }
    }

    /// Lexes `!=`; a bare `!` is not part of the language.
    pub(crate) fn lex_bang(&mut self) -> Result<Token, CompileError> {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Ok(self.simple(TokenKind::NotEqual))
        } else {
            Err(self.error("unrecognized character '!'".to_string()))
        }
    }

    /// Lexes `<`, `<=`, `<<` or `<<=`.
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('<') {
            if self.cursor.match_char('=') {
                self.simple(TokenKind::LeftShiftEqual)
            } else {
                self.simple(TokenKind::LeftShift)
            }
        } else if self.cursor.match_char('=') {
            self.simple(TokenKind::LessEqual)
        } else {
            self.simple(TokenKind::LessThan)
        }
    }

    /// Lexes `>`, `>=`, `>>` or `>>=`.
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            if self.cursor.match_char('=') {
                self.simple(TokenKind::RightShiftEqual)
            } else {
                self.simple(TokenKind::RightShift)
            }
        } else if self.cursor.match_char('=') {
            self.simple(TokenKind::GreaterEqual)
        } else {
            self.simple(TokenKind::GreaterThan)
        }
    }

    /// Lexes `&` or `&=`.
    pub(crate) fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.simple(TokenKind::AmpersandEqual)
        } else {
            self.simple(TokenKind::Ampersand)
        }
    }

    /// Lexes `|` or `|=`.
    pub(crate) fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.simple(TokenKind::BarEqual)
        } else {
            self.simple(TokenKind::Bar)
        }
    }

    /// Lexes `^` or `^=`.
    pub(crate) fn lex_hat(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.simple(TokenKind::HatEqual)
        } else {
            self.simple(TokenKind::Hat)
        }
    }
}
