//! Number literal lexing.
//!
//! Handles the five numeric kinds: decimal integers, binary/octal/hex
//! integers with case-insensitive prefixes, and floats of the forms
//! `digits '.' digits?` and `'.' digits`. Underscores separate digit
//! groups everywhere; there is no exponent form in the language.

use adderc_util::CompileError;

use crate::token::{Token, TokenKind, TokenValue};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a number literal.
    ///
    /// The cursor sits on a digit, or on a `.` followed by a digit.
    pub(crate) fn lex_number(&mut self) -> Result<Token, CompileError> {
        if self.cursor.current_char() == '0' {
            match self.cursor.peek_char(1) {
                'b' | 'B' => return self.lex_based_integer(2, TokenKind::BinaryNumber),
                'o' | 'O' => return self.lex_based_integer(8, TokenKind::OctalNumber),
                'x' | 'X' => return self.lex_based_integer(16, TokenKind::HexadecimalNumber),
                _ => {},
            }
        }

        let start = self.cursor.position();
        while is_decimal_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let is_float = self.cursor.current_char() == '.'
            && (start != self.cursor.position() || self.cursor.peek_char(1).is_ascii_digit());

        if is_float {
            self.cursor.advance();
            while is_decimal_continue(self.cursor.current_char()) {
                self.cursor.advance();
            }

            let text = self.cursor.slice_from(start);
            let (integral, fraction) = text.split_once('.').unwrap_or((&text, ""));
            if !integral.is_empty() {
                self.check_separators(integral)?;
            }
            if !fraction.is_empty() {
                self.check_separators(fraction)?;
            }

            let cleaned: String = text.chars().filter(|c| *c != '_').collect();
            match cleaned.parse::<f64>() {
                Ok(value) => Ok(self.valued(TokenKind::FloatingNumber, TokenValue::Float(value))),
                Err(e) => Err(self.error(format!("invalid floating point literal '{}': {}", text, e))),
            }
        } else {
            let text = self.cursor.slice_from(start);
            self.check_separators(&text)?;

            let cleaned: String = text.chars().filter(|c| *c != '_').collect();
            match cleaned.parse::<i64>() {
                Ok(value) => Ok(self.valued(TokenKind::IntegerNumber, TokenValue::Int(value))),
                Err(e) => Err(self.error(format!("integer literal overflow: {}", e))),
            }
        }
    }

    /// Lexes an integer with a `0b`/`0o`/`0x` prefix.
    fn lex_based_integer(&mut self, base: u32, kind: TokenKind) -> Result<Token, CompileError> {
        self.cursor.advance(); // '0'
        self.cursor.advance(); // prefix letter

        let digit_start = self.cursor.position();
        while self.cursor.current_char() == '_'
            || self.cursor.current_char().is_digit(base)
        {
            self.cursor.advance();
        }

        let digits = self.cursor.slice_from(digit_start);
        if digits.is_empty() {
            return Err(self.error(format!("no digits after base-{} prefix", base)));
        }
        self.check_separators(&digits)?;

        let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
        match i64::from_str_radix(&cleaned, base) {
            Ok(value) => Ok(self.valued(kind, TokenValue::Int(value))),
            Err(e) => Err(self.error(format!("integer literal overflow: {}", e))),
        }
    }

    /// Rejects leading, trailing and doubled underscore separators.
    fn check_separators(&self, digits: &str) -> Result<(), CompileError> {
        if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
            return Err(self.error(format!("malformed digit separators in '{}'", digits)));
        }
        Ok(())
    }
}

/// True for characters that continue a decimal digit run.
fn is_decimal_continue(c: char) -> bool {
    c == '_' || c.is_ascii_digit()
}
