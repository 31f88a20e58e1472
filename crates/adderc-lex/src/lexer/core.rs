//! Core scanner implementation.
//!
//! This module contains the main [`Lexer`] struct, the dispatch loop, and
//! the two suppression rules that make bracketed continuation lines work:
//! while any of the three nesting counters is non-zero, NEWLINE tokens and
//! line-start WHITESPACE runs are swallowed instead of emitted.

use adderc_util::{Category, CompileError, Handler};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind, TokenValue};

/// Number of columns per tab stop when expanding leading whitespace.
const TAB_STOP: usize = 8;

/// Scanner for Adder source text.
///
/// Produces the raw token sequence consumed by the indentation processor:
/// physical newlines and line-start whitespace are explicit tokens,
/// comments vanish, and everything else is classified into the closed
/// [`TokenKind`] vocabulary.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,

    /// Error sink for lexical diagnostics.
    handler: &'a Handler,

    /// Open-parenthesis nesting depth.
    paren_depth: i32,

    /// Open-bracket nesting depth.
    bracket_depth: i32,

    /// Open-brace nesting depth.
    brace_depth: i32,

    /// Whether no token has been produced on the current line yet.
    at_line_start: bool,

    /// Line where the current token starts (1-based).
    token_line: u32,

    /// Column where the current token starts (1-based).
    token_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new scanner over the given source.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            paren_depth: 0,
            bracket_depth: 0,
            brace_depth: 0,
            at_line_start: true,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Scans the whole input into a token vector.
    ///
    /// Stops at the first lexical error.
    pub fn scan(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();
        while !self.cursor.is_at_end() {
            if let Some(token) = self.next_token()? {
                tokens.push(token);
            }
        }
        Ok(tokens)
    }

    /// Scans one lexeme.
    ///
    /// Returns `None` when the lexeme produces no token (comments,
    /// suppressed whitespace and newlines).
    fn next_token(&mut self) -> Result<Option<Token>, CompileError> {
        self.token_line = self.cursor.line();
        self.token_column = self.cursor.column();

        let token = match self.cursor.current_char() {
            '\n' => return Ok(self.lex_newline()),
            ' ' | '\t' | '\x0c' => return Ok(self.lex_whitespace()),
            '#' => {
                self.skip_comment();
                return Ok(None);
            },
            '(' => {
                self.cursor.advance();
                self.paren_depth += 1;
                self.simple(TokenKind::LParenthesis)
            },
            ')' => {
                self.cursor.advance();
                // underflow is the parser's problem
                self.paren_depth -= 1;
                self.simple(TokenKind::RParenthesis)
            },
            '[' => {
                self.cursor.advance();
                self.bracket_depth += 1;
                self.simple(TokenKind::LBracket)
            },
            ']' => {
                self.cursor.advance();
                self.bracket_depth -= 1;
                self.simple(TokenKind::RBracket)
            },
            '{' => {
                self.cursor.advance();
                self.brace_depth += 1;
                self.simple(TokenKind::LCurlyBrace)
            },
            '}' => {
                self.cursor.advance();
                self.brace_depth -= 1;
                self.simple(TokenKind::RCurlyBrace)
            },
            ',' => {
                self.cursor.advance();
                self.simple(TokenKind::Comma)
            },
            ':' => {
                self.cursor.advance();
                self.simple(TokenKind::Colon)
            },
            ';' => {
                self.cursor.advance();
                self.simple(TokenKind::Semicolon)
            },
            '.' => {
                if self.cursor.peek_char(1).is_ascii_digit() {
                    self.lex_number()?
                } else {
                    self.cursor.advance();
                    self.simple(TokenKind::Dot)
                }
            },
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '%' => self.lex_percent(),
            '=' => self.lex_equals(),
            '!' => self.lex_bang()?,
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '&' => self.lex_ampersand(),
            '|' => self.lex_pipe(),
            '^' => self.lex_hat(),
            '~' => {
                self.cursor.advance();
                self.simple(TokenKind::Tilde)
            },
            'r' | 'R' if is_quote(self.cursor.peek_char(1)) => {
                self.lex_prefixed_string(TokenKind::RawString)?
            },
            'u' | 'U' if is_quote(self.cursor.peek_char(1)) => {
                self.lex_prefixed_string(TokenKind::UnicodeString)?
            },
            '"' | '\'' => self.lex_string()?,
            c if c == '_' || c.is_ascii_alphabetic() => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number()?,
            c => {
                return Err(self.error(format!("unrecognized character '{}'", c)));
            },
        };

        self.at_line_start = false;
        Ok(Some(token))
    }

    /// Consumes one physical newline.
    ///
    /// Emitted only outside brackets, one token per physical newline so
    /// the indentation processor can tell empty lines apart.
    fn lex_newline(&mut self) -> Option<Token> {
        self.cursor.advance();
        if self.is_nested() {
            return None;
        }
        self.at_line_start = true;
        Some(Token::new(
            TokenKind::Newline,
            self.token_line,
            self.token_column,
        ))
    }

    /// Consumes a whitespace run.
    ///
    /// The run is normalized before emission: everything up to the last
    /// form feed is discarded and tabs expand to the next 8-column stop.
    /// Only line-start runs outside brackets become tokens.
    fn lex_whitespace(&mut self) -> Option<Token> {
        let start = self.cursor.position();
        while matches!(self.cursor.current_char(), ' ' | '\t' | '\x0c') {
            self.cursor.advance();
        }
        let raw = self.cursor.slice_from(start);

        if !self.at_line_start || self.is_nested() {
            return None;
        }

        let run = match raw.rfind('\x0c') {
            Some(pos) => &raw[pos + 1..],
            None => &raw[..],
        };
        let expanded = expand_tabs(run);

        Some(Token::with_value(
            TokenKind::Whitespace,
            TokenValue::Str(expanded),
            self.token_line,
            self.token_column,
        ))
    }

    /// Skips a comment up to (not including) the line's newline.
    fn skip_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    /// Builds a payload-free token at the current token start.
    pub(crate) fn simple(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.token_line, self.token_column)
    }

    /// Builds a payload-carrying token at the current token start.
    pub(crate) fn valued(&self, kind: TokenKind, value: TokenValue) -> Token {
        Token::with_value(kind, value, self.token_line, self.token_column)
    }

    /// Whether any nesting counter is non-zero.
    fn is_nested(&self) -> bool {
        self.paren_depth != 0 || self.bracket_depth != 0 || self.brace_depth != 0
    }

    /// Records a lexical error at the current token position.
    pub(crate) fn error(&self, message: String) -> CompileError {
        self.handler.fatal(Category::Lex, message, self.token_line)
    }
}

/// True for the two quote characters.
fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Expands tabs against 8-column stops measured within the run.
fn expand_tabs(run: &str) -> String {
    let mut expanded = String::with_capacity(run.len());
    for c in run.chars() {
        if c == '\t' {
            let fill = TAB_STOP - (expanded.len() % TAB_STOP);
            expanded.extend(std::iter::repeat(' ').take(fill));
        } else {
            expanded.push(c);
        }
    }
    expanded
}
