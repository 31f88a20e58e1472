//! Type hint parsing.
//!
//! Hints appear on parameters, variable declarations and return arrows:
//! `NAME`, `NAME[type_series]`, `hint | hint`, or `None`. The parser
//! reads the shape, the checker validates the base names, and nothing is
//! kept: hints occupy no AST slot.

use adderc_lex::TokenKind;
use adderc_util::CompileError;

use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses a full hint: unit (`|` unit)*.
    pub(crate) fn parse_type_hint(&mut self) -> Result<(), CompileError> {
        self.parse_hint_unit()?;
        while self.match_kind(TokenKind::Bar) {
            self.parse_hint_unit()?;
        }
        Ok(())
    }

    /// Parses one hint unit: `None`, or a base name with an optional
    /// bracketed element series.
    fn parse_hint_unit(&mut self) -> Result<(), CompileError> {
        if self.match_kind(TokenKind::None) {
            return Ok(());
        }

        let token = self.expect(TokenKind::Name)?;
        let name = token.name();
        let line = token.line;

        let has_elements = if self.match_kind(TokenKind::LBracket) {
            self.parse_hint_series()?;
            self.expect(TokenKind::RBracket)?;
            true
        } else {
            false
        };

        self.checker_mut().check_hint(name, has_elements, line)
    }

    /// Parses the comma series inside a container hint's brackets.
    fn parse_hint_series(&mut self) -> Result<(), CompileError> {
        self.parse_type_hint()?;
        while self.match_kind(TokenKind::Comma) {
            if self.check(TokenKind::RBracket) {
                break;
            }
            self.parse_type_hint()?;
        }
        Ok(())
    }
}
