//! Edge case and property tests for adderc-lex.

use adderc_util::Handler;
use proptest::prelude::*;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

fn scan(source: &str) -> Vec<Token> {
    let handler = Handler::new();
    Lexer::new(source, &handler).scan().expect("scan failed")
}

fn lex(source: &str) -> Vec<Token> {
    let handler = Handler::new();
    crate::lex(source, &handler).expect("lex failed")
}

// ==================== EDGE CASES ====================

#[test]
fn test_edge_no_trailing_newline() {
    let tokens = lex("a = 1");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::StartToken,
            TokenKind::Name,
            TokenKind::Equal,
            TokenKind::IntegerNumber,
            TokenKind::EndToken,
        ]
    );
}

#[test]
fn test_edge_suite_without_trailing_newline() {
    let tokens = lex("if x:\n    y = 1");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    // the open level still closes at end of input
    assert!(kinds.contains(&TokenKind::Indent));
    assert!(kinds.contains(&TokenKind::Dedent));
}

#[test]
fn test_edge_deeply_nested_brackets() {
    let tokens = scan("x = [[(1, {2}), 3],\n [4]]\n");
    let newlines = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Newline)
        .count();
    assert_eq!(newlines, 1);
}

#[test]
fn test_edge_long_identifier() {
    let name = "a".repeat(10_000);
    let tokens = scan(&name);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Name);
}

#[test]
fn test_edge_crlf_is_rejected() {
    // carriage returns are not in the language's character set
    let handler = Handler::new();
    assert!(Lexer::new("a = 1\r\n", &handler).scan().is_err());
}

#[test]
fn test_edge_comment_then_eof() {
    let tokens = scan("# only a comment");
    assert!(tokens.is_empty());
}

#[test]
fn test_edge_dot_number_boundary() {
    // "1." floats, ".x" stays DOT NAME
    let kinds: Vec<TokenKind> = scan("1. .x").iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::FloatingNumber, TokenKind::Dot, TokenKind::Name]
    );
}

#[test]
fn test_edge_triple_dot_is_three_dots() {
    let kinds: Vec<TokenKind> = scan("...").iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::Dot, TokenKind::Dot, TokenKind::Dot]);
}

#[test]
fn test_edge_blank_first_line() {
    let tokens = lex("\na = 1\n");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    // the leading empty line contributes nothing
    assert_eq!(kinds[1], TokenKind::Name);
}

#[test]
fn test_edge_else_on_deeper_chain() {
    let source = "if a:\n    if b:\n        x = 1\n    else:\n        x = 2\n";
    let tokens = lex(source);
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    let else_at = kinds.iter().position(|k| *k == TokenKind::Else).unwrap();
    assert_eq!(kinds[else_at - 1], TokenKind::Dedent);
}

// ==================== PROPERTY LAWS ====================

/// One rendered program item: either a plain line or a bracketed literal
/// spanning `inner` extra lines.
#[derive(Clone, Debug)]
enum SourceItem {
    Line,
    Bracketed { inner: usize },
}

fn source_item() -> impl Strategy<Value = SourceItem> {
    prop_oneof![
        Just(SourceItem::Line),
        (1usize..4).prop_map(|inner| SourceItem::Bracketed { inner }),
    ]
}

fn render(items: &[SourceItem]) -> (String, usize) {
    let mut source = String::new();
    let mut outside_newlines = 0;
    for item in items {
        match item {
            SourceItem::Line => {
                source.push_str("a = 1\n");
                outside_newlines += 1;
            },
            SourceItem::Bracketed { inner } => {
                source.push_str("x = (0,\n");
                for n in 0..*inner {
                    source.push_str(&format!("    {},\n", n));
                }
                source.push_str("    9)\n");
                outside_newlines += 1;
            },
        }
    }
    (source, outside_newlines)
}

proptest! {
    /// Law 1: NEWLINE tokens emitted == physical newlines outside brackets.
    #[test]
    fn prop_newline_suppression(items in proptest::collection::vec(source_item(), 0..8)) {
        let (source, outside) = render(&items);
        let newlines = scan(&source)
            .iter()
            .filter(|t| t.kind == TokenKind::Newline)
            .count();
        prop_assert_eq!(newlines, outside);
    }

    /// Law 2: INDENTs balance DEDENTs over well-formed programs.
    #[test]
    fn prop_indent_dedent_balance(depths in proptest::collection::vec(0u32..4, 1..12)) {
        // render a block structure where each entry may open one deeper
        // suite or return to the base level
        let mut source = String::new();
        let mut current: u32 = 0;
        for depth in depths {
            let depth = depth.min(current + 1);
            let pad = "    ".repeat(depth as usize);
            if depth > current {
                // re-open at the previous depth with a suite header first
                let header_pad = "    ".repeat(current as usize);
                source.push_str(&format!("{}if x:\n", header_pad));
            }
            source.push_str(&format!("{}a = 1\n", pad));
            current = depth;
        }

        let tokens = lex(&source);
        let indents = tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        prop_assert_eq!(indents, dedents);
    }
}
