//! Off-side-rule indentation processing.
//!
//! Transforms the raw token sequence into one with explicit INDENT and
//! DEDENT markers, in two passes:
//!
//! 1. **Classification** labels each token with `at_line_start` and
//!    `must_indent`. A COLON arms the state machine (MAY_INDENT), the
//!    following NEWLINE confirms it (MUST_INDENT), and the next ordinary
//!    token inherits the obligation.
//! 2. **Reconciliation** tracks a stack of column levels, emitting an
//!    INDENT when an obligated token sits deeper than the current level
//!    and DEDENTs when a line-start token returns to an enclosing level.
//!    Each DEDENT is planted *before* the preceding NEWLINE so the parser
//!    always sees `DEDENT NEWLINE`, and the whitespace/newline carrier
//!    tokens are dropped along the way.
//!
//! Fatal conditions: an obligated token that is not strictly deeper than
//! the current level, a line-start token deeper than the current level,
//! and a dedent to a depth that is not on the level stack.

use adderc_util::{Category, CompileError, Handler};

use crate::token::{Token, TokenKind, TokenValue};

/// Classification states for the `must_indent` pass.
#[derive(Clone, Copy, PartialEq, Eq)]
enum IndentState {
    NoIndent,
    MayIndent,
    MustIndent,
}

/// Builds a synthetic INDENT marker.
fn create_indent(line: u32) -> Token {
    Token::new(TokenKind::Indent, line, 0)
}

/// Builds a synthetic DEDENT marker.
fn create_dedent(line: u32) -> Token {
    Token::new(TokenKind::Dedent, line, 0)
}

/// Runs both indentation passes over the raw token sequence.
pub fn add_indentations(tokens: Vec<Token>, handler: &Handler) -> Result<Vec<Token>, CompileError> {
    let classified = identify_indentations(tokens);
    assign_indentations(classified, handler)
}

/// Pass 1: label every token with its line-start and indent-obligation
/// flags.
fn identify_indentations(tokens: Vec<Token>) -> Vec<Token> {
    let mut at_line_start = true;
    let mut state = IndentState::NoIndent;

    let mut labeled = Vec::with_capacity(tokens.len());
    for mut token in tokens {
        token.at_line_start = at_line_start;

        match token.kind {
            TokenKind::Colon => {
                at_line_start = false;
                // a suite needs COLON NEWLINE; the colon alone only arms
                state = IndentState::MayIndent;
                token.must_indent = false;
            },
            TokenKind::Newline => {
                at_line_start = true;
                if state == IndentState::MayIndent {
                    state = IndentState::MustIndent;
                }
                token.must_indent = false;
            },
            TokenKind::Whitespace => {
                debug_assert!(token.at_line_start);
                at_line_start = true;
                token.must_indent = false;
            },
            _ => {
                token.must_indent = state == IndentState::MustIndent;
                at_line_start = false;
                state = IndentState::NoIndent;
            },
        }

        labeled.push(token);
    }
    labeled
}

/// Pass 2: reconcile line depths against the level stack.
fn assign_indentations(tokens: Vec<Token>, handler: &Handler) -> Result<Vec<Token>, CompileError> {
    let mut levels: Vec<u32> = vec![0];
    let mut depth: u32 = 0;
    let mut last_was_whitespace = false;
    let mut last_line = 1;

    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        last_line = token.line;
        match token.kind {
            TokenKind::Whitespace => {
                debug_assert_eq!(depth, 0);
                depth = match &token.value {
                    TokenValue::Str(run) => run.chars().count() as u32,
                    _ => 0,
                };
                last_was_whitespace = true;
                continue;
            },
            TokenKind::Newline => {
                depth = 0;
                // a newline after leading whitespace or at line start is
                // an empty line and carries no statement boundary
                if !last_was_whitespace && !token.at_line_start {
                    out.push(token);
                }
                continue;
            },
            _ => {},
        }

        last_was_whitespace = false;
        reconcile_depth(token, depth, &mut levels, &mut out, handler)?;
    }

    // close every level still open at end of input
    for _ in 1..levels.len() {
        out.push(create_dedent(last_line));
    }

    Ok(out)
}

/// Compares one ordinary token's depth against the level stack, emitting
/// INDENT/DEDENT markers as needed, then appends the token itself.
fn reconcile_depth(
    token: Token,
    depth: u32,
    levels: &mut Vec<u32>,
    out: &mut Vec<Token>,
    handler: &Handler,
) -> Result<(), CompileError> {
    let top = *levels.last().expect("level stack never empties");

    if token.must_indent {
        if depth <= top {
            return Err(handler.fatal(
                Category::Indentation,
                "expected an indented block",
                token.line,
            ));
        }
        levels.push(depth);
        out.push(create_indent(token.line));
    } else if token.at_line_start {
        if depth > top {
            return Err(handler.fatal(
                Category::Indentation,
                "unexpected indent",
                token.line,
            ));
        }
        if depth < top {
            let index = match levels.iter().position(|level| *level == depth) {
                Some(index) => index,
                None => {
                    return Err(handler.fatal(
                        Category::Indentation,
                        "dedent does not match any outer indentation level",
                        token.line,
                    ));
                },
            };

            // plant each DEDENT before the newline that closed the block,
            // so the parser sees DEDENT NEWLINE
            for _ in (index + 1)..levels.len() {
                let newline = out.pop();
                out.push(create_dedent(token.line.saturating_sub(1)));
                if let Some(newline) = newline {
                    out.push(newline);
                }
            }
            levels.truncate(index + 1);
        }
    }

    out.push(token);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn process(source: &str) -> Vec<Token> {
        let handler = Handler::new();
        let raw = Lexer::new(source, &handler).scan().expect("scan failed");
        add_indentations(raw, &handler).expect("indentation failed")
    }

    fn process_err(source: &str) -> CompileError {
        let handler = Handler::new();
        let raw = Lexer::new(source, &handler).scan().expect("scan failed");
        add_indentations(raw, &handler).expect_err("expected indentation error")
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        process(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_flat_program_has_no_markers() {
        let kinds = kinds("a = 1\nb = 2\n");
        assert!(!kinds.contains(&TokenKind::Indent));
        assert!(!kinds.contains(&TokenKind::Dedent));
    }

    #[test]
    fn test_suite_gets_indent_and_dedent() {
        let kinds = kinds("if x:\n    y = 1\n");
        assert_eq!(
            kinds,
            vec![
                TokenKind::If,
                TokenKind::Name,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Name,
                TokenKind::Equal,
                TokenKind::IntegerNumber,
                TokenKind::Newline,
                TokenKind::Dedent,
            ]
        );
    }

    #[test]
    fn test_dedent_planted_before_newline() {
        let kinds = kinds("if x:\n    y = 1\nz = 2\n");
        let dedent = kinds.iter().position(|k| *k == TokenKind::Dedent).unwrap();
        assert_eq!(kinds[dedent + 1], TokenKind::Newline);
    }

    #[test]
    fn test_nested_suites_close_together() {
        let source = "while a:\n    if b:\n        c = 1\n";
        let kinds = kinds(source);
        let indents = kinds.iter().filter(|k| **k == TokenKind::Indent).count();
        let dedents = kinds.iter().filter(|k| **k == TokenKind::Dedent).count();
        assert_eq!(indents, 2);
        assert_eq!(dedents, 2);
    }

    #[test]
    fn test_partial_dedent() {
        let source = "if a:\n    if b:\n        c = 1\n    d = 2\n";
        let tokens = process(source);
        // the dedent back to 4 columns closes exactly one level
        let dedents = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Dedent)
            .count();
        assert_eq!(dedents, 2);
    }

    #[test]
    fn test_indent_dedent_balance() {
        let source = "def f():\n    if x:\n        y = 1\n    return y\n";
        let kinds = kinds(source);
        let indents = kinds.iter().filter(|k| **k == TokenKind::Indent).count();
        let dedents = kinds.iter().filter(|k| **k == TokenKind::Dedent).count();
        assert_eq!(indents, dedents);
    }

    #[test]
    fn test_empty_lines_are_dropped() {
        let kinds = kinds("a = 1\n\n\nb = 2\n");
        let newlines = kinds.iter().filter(|k| **k == TokenKind::Newline).count();
        assert_eq!(newlines, 2);
    }

    #[test]
    fn test_whitespace_only_line_is_dropped() {
        let kinds = kinds("a = 1\n    \nb = 2\n");
        assert!(!kinds.contains(&TokenKind::Whitespace));
        let newlines = kinds.iter().filter(|k| **k == TokenKind::Newline).count();
        assert_eq!(newlines, 2);
    }

    #[test]
    fn test_comment_only_line_is_dropped() {
        let kinds = kinds("a = 1\n# note\nb = 2\n");
        let newlines = kinds.iter().filter(|k| **k == TokenKind::Newline).count();
        assert_eq!(newlines, 2);
    }

    #[test]
    fn test_missing_indent_is_fatal() {
        let err = process_err("if x:\ny = 1\n");
        assert!(matches!(err, CompileError::Indentation { .. }));
    }

    #[test]
    fn test_shallow_must_indent_is_fatal() {
        let err = process_err("if x:\n    y = 1\n  if z:\n  w = 1\n");
        assert!(matches!(err, CompileError::Indentation { .. }));
    }

    #[test]
    fn test_unexpected_indent_is_fatal() {
        let err = process_err("a = 1\n    b = 2\n");
        assert!(matches!(err, CompileError::Indentation { .. }));
    }

    #[test]
    fn test_inconsistent_dedent_is_fatal() {
        let err = process_err("if x:\n        y = 1\n    z = 2\n");
        assert!(matches!(err, CompileError::Indentation { .. }));
    }

    #[test]
    fn test_eof_closes_open_levels() {
        let kinds = kinds("if x:\n    if y:\n        z = 1\n");
        assert_eq!(kinds[kinds.len() - 2], TokenKind::Dedent);
        assert_eq!(kinds[kinds.len() - 1], TokenKind::Dedent);
    }
}
